//! Backend worker: owns the tokio runtime and the request controller.

use std::{sync::Arc, thread};

use client_core::{
    load_settings, HttpSentimentBackend, MissingSentimentBackend, SentimentBackend,
    SentimentRequestController, SubmitOutcome,
};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

type Controller = SentimentRequestController<Box<dyn SentimentBackend>>;

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        let controller = Arc::new(Controller::new(build_backend(&ui_tx)));

        runtime.block_on(async move {
            let mut state_rx = controller.subscribe();
            let forward_tx = ui_tx.clone();
            tokio::spawn(async move {
                while state_rx.changed().await.is_ok() {
                    let snapshot = state_rx.borrow_and_update().clone();
                    if forward_tx.try_send(UiEvent::StateChanged(snapshot)).is_err() {
                        tracing::warn!("ui event queue unavailable; dropping state update");
                    }
                }
            });

            let _ = ui_tx.try_send(UiEvent::Info("Ready".to_string()));
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::SetText(text) => controller.set_text(text),
                    BackendCommand::Analyze => {
                        let controller = Arc::clone(&controller);
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            if controller.submit().await == SubmitOutcome::Skipped {
                                let _ = ui_tx.try_send(UiEvent::SubmitSkipped);
                            }
                        });
                    }
                }
            }
            tracing::info!("ui command queue closed; backend worker exiting");
        });
    });
}

fn build_backend(ui_tx: &Sender<UiEvent>) -> Box<dyn SentimentBackend> {
    let backend = load_settings()
        .map_err(|err| err.to_string())
        .and_then(|settings| {
            HttpSentimentBackend::from_settings(&settings).map_err(|err| err.to_string())
        });

    match backend {
        Ok(backend) => {
            tracing::info!(endpoint = %backend.endpoint(), "sentiment backend configured");
            Box::new(backend)
        }
        Err(reason) => {
            tracing::error!("sentiment backend unavailable: {reason}");
            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                UiErrorContext::Configuration,
                reason.clone(),
            )));
            Box::new(MissingSentimentBackend::new(reason))
        }
    }
}
