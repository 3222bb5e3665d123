use std::sync::Arc;

use twilight_model::application::interaction::{Interaction, InteractionData, InteractionType};

pub use self::{
    autocomplete::{autocomplete_choices, dispatch_autocomplete},
    command::dispatch_command,
    component::dispatch_component,
};
use crate::{core::Context, interaction::InteractionOrigin};

mod autocomplete;
mod command;
mod component;

pub async fn handle_interaction(ctx: Arc<Context>, interaction: Interaction) {
    let Some(origin) = InteractionOrigin::new(&interaction) else {
        warn!(id = %interaction.id, "Received interaction without channel");

        return;
    };

    match &interaction.data {
        Some(InteractionData::ApplicationCommand(data)) => match interaction.kind {
            InteractionType::ApplicationCommandAutocomplete => {
                dispatch_autocomplete(ctx, origin, &data.name, &data.options).await
            }
            InteractionType::ApplicationCommand => {
                let name = data.name.as_str();

                dispatch_command(ctx, origin, name, data.kind, &data.options, data.target_id)
                    .await;
            }
            _ => {}
        },
        Some(InteractionData::MessageComponent(data)) => {
            dispatch_component(ctx, origin, &data.custom_id, data.values.clone()).await;
        }
        _ => {}
    }
}
