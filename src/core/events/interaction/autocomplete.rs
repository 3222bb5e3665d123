use std::sync::Arc;

use eyre::{Result, WrapErr};
use twilight_model::{
    application::{
        command::CommandOptionChoice, interaction::application_command::CommandDataOption,
    },
    http::interaction::{InteractionResponse, InteractionResponseData, InteractionResponseType},
};

use crate::{
    core::{
        commands::{flatten, focused_path, schema_at, AutocompleteInput},
        events::EventKind,
        Context,
    },
    interaction::InteractionOrigin,
};

/// Upper limit of choices the platform accepts.
const MAX_CHOICES: usize = 25;

pub async fn dispatch_autocomplete(
    ctx: Arc<Context>,
    origin: InteractionOrigin,
    name: &str,
    options: &[CommandDataOption],
) {
    EventKind::Autocomplete.log(&origin, name);

    if let Err(err) = autocomplete(ctx, &origin, name, options).await {
        let wrap = format!("Failed to process autocomplete `{name}`");
        error!("{:?}", err.wrap_err(wrap));
    }
}

async fn autocomplete(
    ctx: Arc<Context>,
    origin: &InteractionOrigin,
    name: &str,
    options: &[CommandDataOption],
) -> Result<()> {
    let Some(choices) = autocomplete_choices(Arc::clone(&ctx), name, options).await? else {
        return Ok(());
    };

    let data = InteractionResponseData {
        choices: Some(choices),
        ..Default::default()
    };

    let response = InteractionResponse {
        kind: InteractionResponseType::ApplicationCommandAutocompleteResult,
        data: Some(data),
    };

    ctx.client()
        .create_response(origin.id, &origin.token, &response)
        .await
        .wrap_err("Failed to send autocomplete choices")
}

/// Compute the choices for the focused option of a command.
///
/// `None` if the command, its focused option, or the option's handler is
/// unknown.
pub async fn autocomplete_choices(
    ctx: Arc<Context>,
    name: &str,
    options: &[CommandDataOption],
) -> Result<Option<Vec<CommandOptionChoice>>> {
    let Some(command) = ctx.command(name) else {
        warn!(name, "Autocomplete for unknown command");

        return Ok(None);
    };

    let Some((path, value)) = focused_path(options) else {
        debug!(name, "Autocomplete without focused option");

        return Ok(None);
    };

    let handler = schema_at(&command.options, &path).and_then(|schema| schema.autocomplete.clone());

    let Some(handler) = handler else {
        debug!(name, ?path, "Focused option has no autocomplete handler");

        return Ok(None);
    };

    let input = AutocompleteInput {
        path: path.iter().map(|name| (*name).to_owned()).collect(),
        value: value.to_owned(),
        args: flatten(options),
    };

    let choices = handler(ctx, input)
        .await?
        .into_iter()
        .take(MAX_CHOICES)
        .map(CommandOptionChoice::from)
        .collect();

    Ok(Some(choices))
}

#[cfg(test)]
mod tests {
    use futures::FutureExt;
    use twilight_model::{
        application::{
            command::{CommandOptionChoiceValue, CommandOptionType},
            interaction::application_command::CommandOptionValue,
        },
        id::Id,
    };

    use super::*;
    use crate::{
        core::{
            client::testing::{context, Call, CHANNEL_ID},
            commands::{Command, OptionChoice, OptionSchema},
            BotConfig,
        },
        interaction::InteractionKind,
    };

    fn command() -> Command {
        let fruit = OptionSchema::string("fruit", "Pick a fruit").autocomplete(|_, input| {
            async move {
                let choices: Vec<_> = ["apple", "apricot", "banana"]
                    .into_iter()
                    .filter(|fruit| fruit.starts_with(input.value.as_str()))
                    .map(|fruit| OptionChoice::string(fruit, fruit))
                    .collect();

                Ok::<_, eyre::Report>(choices)
            }
            .boxed()
        });

        let many = OptionSchema::integer("many", "Lots of choices").autocomplete(|_, _| {
            let choices: Vec<_> = (0..100)
                .map(|n| OptionChoice::integer(n.to_string(), n))
                .collect();

            async move { Ok::<_, eyre::Report>(choices) }.boxed()
        });

        let pick = OptionSchema::sub_command("pick", "Pick things", vec![fruit, many]);

        Command::new("food", "", |_, _| async { Ok(()) }.boxed()).option(pick)
    }

    fn focused(name: &str, value: &str, kind: CommandOptionType) -> Vec<CommandDataOption> {
        vec![CommandDataOption {
            name: "pick".to_owned(),
            value: CommandOptionValue::SubCommand(vec![CommandDataOption {
                name: name.to_owned(),
                value: CommandOptionValue::Focused(value.to_owned(), kind),
            }]),
        }]
    }

    fn origin() -> InteractionOrigin {
        InteractionOrigin {
            id: Id::new(5),
            token: "token".to_owned(),
            channel_id: CHANNEL_ID,
            guild_id: None,
            user_id: Some(Id::new(42)),
            username: None,
            permissions: None,
            kind: InteractionKind::Command,
        }
    }

    #[tokio::test]
    async fn choices_are_sent_as_autocomplete_result() {
        let (ctx, client) = context(BotConfig::new("token"));
        ctx.add_command(command()).unwrap();

        let options = focused("fruit", "ap", CommandOptionType::String);
        dispatch_autocomplete(Arc::clone(&ctx), origin(), "food", &options).await;

        let expected = Call::CreateResponse {
            interaction_id: Id::new(5),
            kind: InteractionResponseType::ApplicationCommandAutocompleteResult,
            ephemeral: false,
            content: None,
        };

        assert_eq!(client.calls(), [expected]);

        client.clear();
        dispatch_autocomplete(ctx, origin(), "drinks", &options).await;

        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn nested_focused_option() {
        let (ctx, _) = context(BotConfig::new("token"));
        ctx.add_command(command()).unwrap();

        let options = focused("fruit", "ap", CommandOptionType::String);
        let choices = autocomplete_choices(ctx, "food", &options)
            .await
            .unwrap()
            .unwrap();

        let names: Vec<_> = choices.iter().map(|choice| choice.name.as_str()).collect();
        assert_eq!(names, ["apple", "apricot"]);
        assert_eq!(
            choices[0].value,
            CommandOptionChoiceValue::String("apple".to_owned())
        );
    }

    #[tokio::test]
    async fn choices_are_capped() {
        let (ctx, _) = context(BotConfig::new("token"));
        ctx.add_command(command()).unwrap();

        let options = focused("many", "", CommandOptionType::Integer);
        let choices = autocomplete_choices(ctx, "food", &options)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(choices.len(), MAX_CHOICES);
    }

    #[tokio::test]
    async fn unknown_targets_yield_nothing() {
        let (ctx, _) = context(BotConfig::new("token"));
        ctx.add_command(command()).unwrap();

        let options = focused("fruit", "ap", CommandOptionType::String);
        assert!(autocomplete_choices(Arc::clone(&ctx), "drinks", &options)
            .await
            .unwrap()
            .is_none());

        let options = focused("vegetable", "ca", CommandOptionType::String);
        assert!(autocomplete_choices(ctx, "food", &options)
            .await
            .unwrap()
            .is_none());
    }
}
