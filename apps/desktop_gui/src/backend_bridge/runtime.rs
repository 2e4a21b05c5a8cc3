//! Backend worker: a dedicated thread hosting the tokio runtime that executes
//! answer requests off the UI thread.

use std::{sync::Arc, thread, time::Duration};

use client_core::{answer_with_timeout, open_citation, AnswerProvider, LinkOpener};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiEvent};

pub struct BackendConfig {
    pub provider: Arc<dyn AnswerProvider>,
    pub opener: Arc<dyn LinkOpener>,
    pub request_timeout: Duration,
}

pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    config: BackendConfig,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::runtime_startup(&err)));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let _ = ui_tx.try_send(UiEvent::Info("Ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::AnswerQuery { request_id, query } => {
                        let provider = Arc::clone(&config.provider);
                        let ui_tx = ui_tx.clone();
                        let timeout = config.request_timeout;
                        tokio::spawn(async move {
                            tracing::info!(request = %request_id, "answer request started");
                            let result =
                                answer_with_timeout(provider.as_ref(), &query, timeout).await;
                            // A settled answer must not be lost to a full queue, or the
                            // controller stays in Loading; wait for the UI to drain.
                            let event = UiEvent::AnswerSettled { request_id, result };
                            let delivered =
                                tokio::task::spawn_blocking(move || ui_tx.send(event)).await;
                            if !matches!(delivered, Ok(Ok(()))) {
                                tracing::warn!(
                                    request = %request_id,
                                    "ui event queue closed; answer dropped"
                                );
                            }
                        });
                    }
                    BackendCommand::OpenCitation(citation) => {
                        let opener = Arc::clone(&config.opener);
                        let ui_tx = ui_tx.clone();
                        let spawned = tokio::task::spawn_blocking(move || {
                            open_citation(&citation, opener.as_ref());
                        })
                        .await;
                        if let Err(err) = spawned {
                            tracing::warn!("citation opener task failed: {err}");
                            let _ = ui_tx.try_send(UiEvent::Error(UiError::citation_task(&err)));
                        }
                    }
                }
            }
            tracing::debug!("ui command queue closed; backend worker exiting");
        });
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_core::{canned_answer, CannedAnswerProvider, RecordingLinkOpener};
    use crossbeam_channel::bounded;
    use shared::{domain::RequestId, error::RetrievalError};

    use crate::controller::events::{UiErrorCategory, UiErrorContext};

    struct PanickingOpener;

    impl LinkOpener for PanickingOpener {
        fn open(&self, _link: &str) -> std::io::Result<()> {
            panic!("opener blew up");
        }
    }

    fn next_answer(ui_rx: &Receiver<UiEvent>) -> (RequestId, Result<shared::domain::Answer, RetrievalError>) {
        loop {
            match ui_rx
                .recv_timeout(Duration::from_secs(10))
                .expect("backend event")
            {
                UiEvent::AnswerSettled { request_id, result } => return (request_id, result),
                UiEvent::Info(_) => continue,
                UiEvent::Error(err) => panic!("unexpected backend error: {err:?}"),
            }
        }
    }

    #[test]
    fn worker_answers_and_tags_request() {
        let (cmd_tx, cmd_rx) = bounded(8);
        let (ui_tx, ui_rx) = bounded(8);
        let worker = launch(
            cmd_rx,
            ui_tx,
            BackendConfig {
                provider: Arc::new(CannedAnswerProvider::new(Duration::ZERO)),
                opener: Arc::new(RecordingLinkOpener::default()),
                request_timeout: Duration::from_secs(5),
            },
        );

        cmd_tx
            .send(BackendCommand::AnswerQuery {
                request_id: RequestId(7),
                query: "What is X?".to_string(),
            })
            .expect("send");

        let (request_id, result) = next_answer(&ui_rx);
        assert_eq!(request_id, RequestId(7));
        assert_eq!(result, Ok(canned_answer()));

        drop(cmd_tx);
        worker.join().expect("worker exits");
    }

    #[test]
    fn worker_times_out_slow_provider() {
        let (cmd_tx, cmd_rx) = bounded(8);
        let (ui_tx, ui_rx) = bounded(8);
        let _worker = launch(
            cmd_rx,
            ui_tx,
            BackendConfig {
                provider: Arc::new(CannedAnswerProvider::new(Duration::from_secs(60))),
                opener: Arc::new(RecordingLinkOpener::default()),
                request_timeout: Duration::from_millis(50),
            },
        );

        cmd_tx
            .send(BackendCommand::AnswerQuery {
                request_id: RequestId(1),
                query: "What is X?".to_string(),
            })
            .expect("send");

        let (_, result) = next_answer(&ui_rx);
        assert_eq!(
            result,
            Err(RetrievalError::Timeout(Duration::from_millis(50)))
        );
    }

    #[test]
    fn worker_opens_citation_link_verbatim() {
        let (cmd_tx, cmd_rx) = bounded(8);
        let (ui_tx, _ui_rx) = bounded(8);
        let opener = RecordingLinkOpener::default();
        let worker = launch(
            cmd_rx,
            ui_tx,
            BackendConfig {
                provider: Arc::new(CannedAnswerProvider::new(Duration::ZERO)),
                opener: Arc::new(opener.clone()),
                request_timeout: Duration::from_secs(5),
            },
        );

        let citation = canned_answer().citations[0].clone();
        cmd_tx
            .send(BackendCommand::OpenCitation(citation.clone()))
            .expect("send");
        drop(cmd_tx);
        worker.join().expect("worker exits");

        assert_eq!(opener.opened(), vec![citation.link]);
    }

    #[test]
    fn answers_survive_a_full_ui_queue() {
        let (cmd_tx, cmd_rx) = bounded(8);
        // Room for one event only; "Ready" takes it before any answer settles.
        let (ui_tx, ui_rx) = bounded(1);
        let worker = launch(
            cmd_rx,
            ui_tx,
            BackendConfig {
                provider: Arc::new(CannedAnswerProvider::new(Duration::ZERO)),
                opener: Arc::new(RecordingLinkOpener::default()),
                request_timeout: Duration::from_secs(5),
            },
        );

        for id in [1, 2] {
            cmd_tx
                .send(BackendCommand::AnswerQuery {
                    request_id: RequestId(id),
                    query: "What is X?".to_string(),
                })
                .expect("send");
        }
        thread::sleep(Duration::from_millis(200));

        let mut settled = vec![next_answer(&ui_rx).0, next_answer(&ui_rx).0];
        settled.sort_by_key(|id| id.0);
        assert_eq!(settled, vec![RequestId(1), RequestId(2)]);

        drop(cmd_tx);
        worker.join().expect("worker exits");
    }

    #[test]
    fn opener_task_failure_raises_citation_error() {
        let (cmd_tx, cmd_rx) = bounded(8);
        let (ui_tx, ui_rx) = bounded(8);
        let worker = launch(
            cmd_rx,
            ui_tx,
            BackendConfig {
                provider: Arc::new(CannedAnswerProvider::new(Duration::ZERO)),
                opener: Arc::new(PanickingOpener),
                request_timeout: Duration::from_secs(5),
            },
        );

        cmd_tx
            .send(BackendCommand::OpenCitation(canned_answer().citations[0].clone()))
            .expect("send");
        drop(cmd_tx);
        worker.join().expect("worker exits");

        let err = ui_rx
            .try_iter()
            .find_map(|event| match event {
                UiEvent::Error(err) => Some(err),
                _ => None,
            })
            .expect("citation error event");
        assert_eq!(err.context(), UiErrorContext::OpenCitation);
        assert_eq!(err.category(), UiErrorCategory::Task);
        assert!(err.message().starts_with("citation opener task failed"));
    }
}
