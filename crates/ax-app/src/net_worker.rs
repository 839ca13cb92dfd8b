//! Network worker thread. All backend I/O happens here so the UI
//! thread never blocks; results come back through the event loop
//! proxy. There is no cancellation - at most one generation request is
//! in flight at a time, guarded by the form's busy flag.

use std::path::PathBuf;
use std::sync::mpsc::{channel, Sender};
use std::sync::Arc;
use std::thread;

use log::warn;
use uuid::Uuid;
use winit::event_loop::EventLoopProxy;

use ax_core::GenError;

use crate::client::GenClient;
use crate::events::{AxEvent, NetEvent};
use crate::form::GenRequest;

pub enum NetCommand {
    Generate(GenRequest),
    FetchPreview { result_id: Uuid, url: String },
    FetchAsset { url: String },
    Download { url: String, dest: PathBuf },
    Shutdown,
}

pub struct NetWorker {
    command_tx: Sender<NetCommand>,
}

impl NetWorker {
    pub fn new(client: GenClient, proxy: Arc<EventLoopProxy<AxEvent>>) -> Self {
        let (command_tx, command_rx) = channel::<NetCommand>();

        thread::spawn(move || {
            let send = |event: NetEvent| {
                // The loop may already be gone during shutdown.
                let _ = proxy.send_event(AxEvent::Net(event));
            };

            loop {
                match command_rx.recv() {
                    Ok(NetCommand::Generate(request)) => {
                        let result = run_generation(&client, request);
                        send(NetEvent::GenerationFinished(result));
                    }

                    Ok(NetCommand::FetchPreview { result_id, url }) => {
                        let bytes = fetch_local_or_remote(&client, &url);
                        send(NetEvent::PreviewFetched { result_id, bytes });
                    }

                    Ok(NetCommand::FetchAsset { url }) => {
                        let bytes = client
                            .fetch_bytes(&url)
                            .map_err(|e| e.to_string());
                        send(NetEvent::AssetFetched { url, bytes });
                    }

                    Ok(NetCommand::Download { url, dest }) => {
                        let filename = dest
                            .file_name()
                            .map(|n| n.to_string_lossy().into_owned())
                            .unwrap_or_default();
                        let result = client
                            .fetch_bytes(&url)
                            .map_err(|e| e.to_string())
                            .and_then(|bytes| {
                                std::fs::write(&dest, bytes)
                                    .map(|_| dest.clone())
                                    .map_err(|e| format!("Failed to write {}: {e}", dest.display()))
                            });
                        send(NetEvent::DownloadFinished { filename, result });
                    }

                    Ok(NetCommand::Shutdown) | Err(_) => {
                        break;
                    }
                }
            }
        });

        Self { command_tx }
    }

    pub fn send(&self, command: NetCommand) {
        if self.command_tx.send(command).is_err() {
            warn!("Network worker is gone, dropping command");
        }
    }

    /// Ask the worker to stop. A request already in flight finishes on
    /// its own; the thread is not joined so closing the window never
    /// blocks on the backend.
    pub fn shutdown(&mut self) {
        let _ = self.command_tx.send(NetCommand::Shutdown);
    }
}

impl Drop for NetWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_generation(
    client: &GenClient,
    request: GenRequest,
) -> Result<ax_core::GenerationResult, GenError> {
    match request {
        GenRequest::Image { prompt } => client.generate_image(&prompt),
        GenRequest::ModelFromText { prompt } => client.generate_model_from_text(&prompt),
        GenRequest::ModelFromImage { path, name } => {
            let bytes = std::fs::read(&path).map_err(|e| {
                GenError::Transport(format!("Failed to read {}: {e}", path.display()))
            })?;
            let preview = Some(path.to_string_lossy().into_owned());
            client.generate_model_from_image(&name, bytes, preview)
        }
    }
}

/// Previews can be backend urls or paths of locally selected files.
fn fetch_local_or_remote(client: &GenClient, url: &str) -> Result<Vec<u8>, String> {
    let path = std::path::Path::new(url);
    if path.is_file() {
        return std::fs::read(path).map_err(|e| format!("Failed to read {url}: {e}"));
    }
    client.fetch_bytes(url).map_err(|e| e.to_string())
}
