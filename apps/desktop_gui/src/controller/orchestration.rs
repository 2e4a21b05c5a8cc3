//! Command orchestration helpers from UI actions to backend command queue.

use client_core::{PendingRequest, QueryController, SubmitBlocked};
use crossbeam_channel::{Sender, TrySendError};
use shared::{domain::Citation, error::RetrievalError};

use crate::backend_bridge::commands::BackendCommand;

/// Returns `false` when the command could not be queued; `status` then says why.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) -> bool {
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            true
        }
        Err(TrySendError::Full(_)) => {
            *status = "UI command queue is full; please retry".to_string();
            tracing::warn!(command = cmd_name, "ui->backend command queue is full");
            false
        }
        Err(TrySendError::Disconnected(_)) => {
            *status =
                "Backend command processor disconnected (possible startup/runtime failure); restart the app"
                    .to_string();
            tracing::error!(command = cmd_name, "ui->backend command queue disconnected");
            false
        }
    }
}

/// Moves the controller into `Loading` and hands the frozen query to the backend.
///
/// If the backend cannot take the request, the request fails immediately so the
/// UI never sits in `Loading` waiting for an answer that will not come.
pub fn submit_current_query(
    controller: &mut QueryController,
    cmd_tx: &Sender<BackendCommand>,
    status: &mut String,
) -> Result<(), SubmitBlocked> {
    let PendingRequest { request_id, query } = controller.submit()?;
    let queued = dispatch_backend_command(
        cmd_tx,
        BackendCommand::AnswerQuery { request_id, query },
        status,
    );
    if queued {
        *status = "Analyzing...".to_string();
    } else {
        controller.reject(request_id, RetrievalError::Unavailable(status.clone()));
    }
    Ok(())
}

pub fn request_open_citation(cmd_tx: &Sender<BackendCommand>, citation: &Citation, status: &mut String) {
    dispatch_backend_command(cmd_tx, BackendCommand::OpenCitation(citation.clone()), status);
}
