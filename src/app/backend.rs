//! Backend requests - one spawned task per user action
//!
//! Every endpoint goes through the same send-and-interpret path: a non-2xx
//! status or a present `error` field is a failure either way, and the
//! resulting event always reaches the session so the pending flag clears.

use eframe::egui;
use serde::de::DeserializeOwned;
use tracing::info;

use super::App;
use crate::types::{
    ActionKind, BackendEvent, ErrorBody, ExecuteRequest, ExecuteResponse, FixRequest,
    FixResponse, GenerateRequest, GenerateResponse, InstallRequest, MessageResponse,
    ModelsResponse, Outcome, SaveRequest,
};

/// Sends a prepared request and decodes the JSON body. On a non-2xx
/// status a server-supplied `error` message wins over the generic one.
async fn send_json<R: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    fallback: String,
) -> Result<R, String> {
    let response = request.send().await.map_err(|e| e.to_string())?;
    let status = response.status();
    if !status.is_success() {
        if let Ok(body) = response.json::<ErrorBody>().await {
            if let Some(message) = body.error {
                return Err(message);
            }
        }
        return Err(format!("{fallback} (HTTP {status})"));
    }
    response.json::<R>().await.map_err(|e| e.to_string())
}

impl App {
    /// Common tail of every starter: push the completion event and wake
    /// the UI thread.
    fn spawn_action(
        &self,
        ctx: &egui::Context,
        kind: ActionKind,
        task: impl std::future::Future<Output = Result<Outcome, String>> + Send + 'static,
    ) {
        let events = self.events.clone();
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            let outcome = task.await;
            events.lock().unwrap().push(BackendEvent::Action { kind, outcome });
            ctx.request_repaint();
        });
    }

    pub fn start_generate(&mut self, ctx: &egui::Context) {
        if self.session.begin(ActionKind::Generate).is_err() {
            return;
        }
        let body = GenerateRequest {
            prompt: self.session.prompt.clone(),
            mode: self.session.mode.as_str(),
            model: self.session.model.clone(),
            language: self.session.language.as_str(),
            execute: self.session.run_after_generate,
        };
        let run_after = self.session.run_after_generate;
        info!(model = %body.model, mode = body.mode, language = body.language, "Generate requested");

        let request = self.client.post(format!("{}/generate", self.base_url())).json(&body);
        self.spawn_action(ctx, ActionKind::Generate, async move {
            send_json::<GenerateResponse>(request, "Failed to generate code".to_string())
                .await
                .and_then(GenerateResponse::into_code)
                .map(|code| Outcome::Generated { code, run_after })
        });
    }

    pub fn start_execute(&mut self, ctx: &egui::Context) {
        if self.session.begin(ActionKind::Execute).is_err() {
            return;
        }
        let body = ExecuteRequest {
            code: self.session.code.clone(),
            mode: self.session.mode.as_str(),
            model: self.session.model.clone(),
            language: self.session.language.as_str(),
        };
        info!(language = body.language, "Execute requested");

        let request = self.client.post(format!("{}/execute", self.base_url())).json(&body);
        self.spawn_action(ctx, ActionKind::Execute, async move {
            send_json::<ExecuteResponse>(request, "Failed to execute code".to_string())
                .await
                .and_then(ExecuteResponse::into_parts)
                .map(|(result, special)| Outcome::Executed { result, special })
        });
    }

    pub fn start_fix(&mut self, ctx: &egui::Context) {
        if self.session.begin(ActionKind::Fix).is_err() {
            return;
        }
        let body = FixRequest {
            code: self.session.code.clone(),
        };
        info!("Fix requested");

        let request = self.client.post(format!("{}/fix", self.base_url())).json(&body);
        self.spawn_action(ctx, ActionKind::Fix, async move {
            send_json::<FixResponse>(request, "Failed to fix code".to_string())
                .await
                .and_then(FixResponse::into_code)
                .map(|code| Outcome::Fixed { code })
        });
    }

    pub fn start_save(&mut self, ctx: &egui::Context) {
        if self.session.begin(ActionKind::Save).is_err() {
            return;
        }
        let body = SaveRequest {
            code: self.session.code.clone(),
        };
        info!("Save requested");

        let request = self.client.post(format!("{}/save_code", self.base_url())).json(&body);
        self.spawn_action(ctx, ActionKind::Save, async move {
            send_json::<MessageResponse>(request, "Failed to save code".to_string())
                .await
                .and_then(|r| r.into_message("Code saved successfully"))
                .map(|message| Outcome::Saved { message })
        });
    }

    pub fn start_install(&mut self, ctx: &egui::Context) {
        if self.session.begin(ActionKind::Install).is_err() {
            return;
        }
        let package = self.session.package_name.trim().to_string();
        let body = InstallRequest {
            package: package.clone(),
            mode: self.session.mode.as_str(),
            model: self.session.model.clone(),
            language: self.session.language.as_str(),
        };
        info!(package = %package, "Install requested");

        let request = self.client.post(format!("{}/install", self.base_url())).json(&body);
        self.spawn_action(ctx, ActionKind::Install, async move {
            send_json::<MessageResponse>(
                request,
                format!("Failed to install package: {package}"),
            )
            .await
            .and_then(|r| {
                let fallback = format!("Package {package} installed successfully");
                r.into_message(&fallback)
            })
            .map(|message| Outcome::Installed { message })
        });
    }

    pub fn start_load_models(&mut self, ctx: &egui::Context) {
        if self.session.begin(ActionKind::LoadModels).is_err() {
            return;
        }
        info!(url = %self.backend_url, "Fetching model list");

        let request = self.client.get(format!("{}/get_models", self.base_url()));
        self.spawn_action(ctx, ActionKind::LoadModels, async move {
            send_json::<ModelsResponse>(request, "Failed to fetch models".to_string())
                .await
                .and_then(ModelsResponse::into_models)
                .map(|names| Outcome::Models { names })
        });
    }
}
