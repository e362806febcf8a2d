// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `solara recommend | receipt | chat`: backend-facing commands.

use colored::Colorize;
use solara_api::{apply_actions, ConversationClient, OrderSummary};
use solara_core::SolaraError;
use solara_session::{reduce, Action, ApplianceForm, View};
use tracing::info;

use crate::app::App;

/// Submits the stored appliance list and prints the priced system.
pub async fn run_recommend(app: &App) -> Result<(), SolaraError> {
    let form = app.form().await;
    let client = app.recommendation_client()?;
    println!(
        "Sizing a system for {} appliance(s)...",
        form.records().len()
    );

    let result = match client.submit(form.records(), &app.cancel).await {
        Ok(result) => result,
        Err(e @ SolaraError::Backend { .. }) => {
            eprintln!("{} {e}", "recommendation failed:".red());
            eprintln!("Check your connection and run {} again.", "solara recommend".bold());
            return Err(e);
        }
        Err(e) => return Err(e),
    };

    let state = app.load_state().await;
    let state = reduce(state, Action::RecommendationReceived(result));
    if let Some(result) = &state.last_recommendation {
        println!("\n{}", state.view.title().bold().green());
        println!("{}", OrderSummary::new(result));
    }
    app.save_state(&state).await
}

/// Shows the last stored recommendation, optionally recording a delivery address.
pub async fn run_receipt(app: &App, address: Option<String>) -> Result<(), SolaraError> {
    let mut state = app.load_state().await;
    if let Some(address) = address {
        state = reduce(state, Action::SetAddress(address));
    }
    state = reduce(state, Action::Navigate(View::Receipt));

    let Some(result) = &state.last_recommendation else {
        println!(
            "No recommendation yet. Run {} first.",
            "solara recommend".bold()
        );
        return app.save_state(&state).await;
    };

    let summary = OrderSummary::new(result).with_address(state.last_address.as_deref());
    println!("{}", state.view.title().bold().green());
    println!("{summary}");
    app.save_state(&state).await
}

/// Sends one message to the conversational assistant and applies any
/// fields it fills to a new draft appliance.
pub async fn run_chat(app: &App, message: &str) -> Result<(), SolaraError> {
    let mut client = ConversationClient::from_config(&app.config.backend)?;
    let mut form: ApplianceForm = app.form().await;
    let context = serde_json::json!({
        "appliances": form.records().len(),
        "currentStep": "intake",
    });

    let response = tokio::select! {
        _ = app.cancel.cancelled() => return Err(SolaraError::Cancelled),
        response = client.send(message, context) => response?,
    };
    info!(intent = ?response.intent, actions = response.actions.len(), "assistant replied");

    println!("{} {}", "solara:".bold().cyan(), response.response);
    let filled = apply_actions(&mut form, &response.actions);
    for field in &filled {
        if let Some(value) = form.get().field_value(*field) {
            println!("  {} {} = {value}", "filled".green(), field.label());
        }
    }
    for suggestion in &response.suggestions {
        println!("  {} {suggestion}", "try:".dimmed());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use solara_session::AppState;
    use tokio_util::sync::CancellationToken;

    #[tokio::test]
    async fn receipt_records_address_without_a_recommendation() {
        let app = App::open(Default::default(), true, CancellationToken::new())
            .await
            .unwrap();
        run_receipt(&app, Some("12 Marina Road, Lagos".into()))
            .await
            .unwrap();

        let state: AppState = app.load_state().await;
        assert_eq!(state.last_address.as_deref(), Some("12 Marina Road, Lagos"));
        assert!(state.last_recommendation.is_none());
    }

    #[tokio::test]
    async fn recommend_with_empty_list_is_a_validation_error() {
        let app = App::open(Default::default(), true, CancellationToken::new())
            .await
            .unwrap();
        let err = run_recommend(&app).await.unwrap_err();
        assert!(matches!(err, SolaraError::Validation(_)));
    }
}
