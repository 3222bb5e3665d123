use std::sync::Arc;

use async_trait::async_trait;
use eyre::{Result, WrapErr};
use twilight_http::{client::InteractionClient, Client};
use twilight_model::{
    application::command::{Command as TwilightCommand, CommandType},
    channel::message::MessageFlags,
    http::interaction::InteractionResponse,
    id::{
        marker::{ApplicationMarker, ChannelMarker, InteractionMarker, MessageMarker},
        Id,
    },
    user::CurrentUser,
};

use super::{CommandScope, DiscordApi, SentMessage};
use crate::{
    core::commands::RemoteCommand,
    util::{MessageBuilder, ReactionEmoji},
};

/// [`DiscordApi`] on top of twilight's http client.
pub struct TwilightClient {
    http: Arc<Client>,
    application_id: Id<ApplicationMarker>,
    current_user: CurrentUser,
}

impl TwilightClient {
    pub async fn new(token: &str) -> Result<Self> {
        let http = Client::builder()
            .token(token.to_owned())
            .remember_invalid_token(false)
            .build();

        let http = Arc::new(http);

        let current_user = http
            .current_user()
            .await
            .wrap_err("failed to get current user")?
            .model()
            .await
            .wrap_err("failed to deserialize current user")?;

        let application_id = current_user.id.cast();

        Ok(Self {
            http,
            application_id,
            current_user,
        })
    }

    pub fn http(&self) -> &Arc<Client> {
        &self.http
    }

    pub fn interaction(&self) -> InteractionClient<'_> {
        self.http.interaction(self.application_id)
    }

    pub fn current_user(&self) -> &CurrentUser {
        &self.current_user
    }
}

#[async_trait]
impl DiscordApi for TwilightClient {
    async fn create_message(
        &self,
        channel_id: Id<ChannelMarker>,
        builder: &MessageBuilder,
        reply_to: Option<Id<MessageMarker>>,
    ) -> Result<SentMessage> {
        let mut req = self.http.create_message(channel_id);

        if let Some(msg_id) = reply_to {
            req = req.reply(msg_id);
        }

        if let Some(ref content) = builder.content {
            req = req.content(content).wrap_err("invalid message content")?;
        }

        if builder.embed.is_some() {
            req = req
                .embeds(builder.embeds())
                .wrap_err("invalid message embed")?;
        }

        if let Some(ref components) = builder.components {
            req = req
                .components(components)
                .wrap_err("invalid message components")?;
        }

        let msg = req
            .await
            .wrap_err("failed to create message")?
            .model()
            .await
            .wrap_err("failed to deserialize message")?;

        Ok(SentMessage::from(&msg))
    }

    async fn update_message(
        &self,
        msg: SentMessage,
        builder: &MessageBuilder,
    ) -> Result<SentMessage> {
        let msg = self
            .http
            .update_message(msg.channel_id, msg.id)
            .content(builder.content.as_deref())
            .wrap_err("invalid message content")?
            .embeds(Some(builder.embeds()))
            .wrap_err("invalid message embed")?
            .components(Some(builder.component_slice()))
            .wrap_err("invalid message components")?
            .await
            .wrap_err("failed to update message")?
            .model()
            .await
            .wrap_err("failed to deserialize message")?;

        Ok(SentMessage::from(&msg))
    }

    async fn delete_message(&self, msg: SentMessage) -> Result<()> {
        self.http
            .delete_message(msg.channel_id, msg.id)
            .await
            .wrap_err("failed to delete message")?;

        Ok(())
    }

    async fn create_typing_trigger(&self, channel_id: Id<ChannelMarker>) -> Result<()> {
        self.http
            .create_typing_trigger(channel_id)
            .await
            .wrap_err("failed to trigger typing")?;

        Ok(())
    }

    async fn create_reaction(&self, msg: SentMessage, emoji: &ReactionEmoji) -> Result<()> {
        self.http
            .create_reaction(msg.channel_id, msg.id, &emoji.request_reaction_type())
            .await
            .wrap_err_with(|| format!("failed to react with {emoji}"))?;

        Ok(())
    }

    async fn delete_all_reactions(&self, msg: SentMessage) -> Result<()> {
        self.http
            .delete_all_reactions(msg.channel_id, msg.id)
            .await
            .wrap_err("failed to delete all reactions")?;

        Ok(())
    }

    async fn delete_current_user_reaction(
        &self,
        msg: SentMessage,
        emoji: &ReactionEmoji,
    ) -> Result<()> {
        self.http
            .delete_current_user_reaction(msg.channel_id, msg.id, &emoji.request_reaction_type())
            .await
            .wrap_err_with(|| format!("failed to delete own reaction {emoji}"))?;

        Ok(())
    }

    async fn create_response(
        &self,
        interaction_id: Id<InteractionMarker>,
        token: &str,
        response: &InteractionResponse,
    ) -> Result<()> {
        self.interaction()
            .create_response(interaction_id, token, response)
            .await
            .wrap_err("failed to create interaction response")?;

        Ok(())
    }

    async fn response(&self, token: &str) -> Result<SentMessage> {
        let msg = self
            .interaction()
            .response(token)
            .await
            .wrap_err("failed to get interaction response")?
            .model()
            .await
            .wrap_err("failed to deserialize interaction response")?;

        Ok(SentMessage::from(&msg))
    }

    async fn update_response(&self, token: &str, builder: &MessageBuilder) -> Result<SentMessage> {
        let msg = self
            .interaction()
            .update_response(token)
            .content(builder.content.as_deref())
            .wrap_err("invalid response content")?
            .embeds(Some(builder.embeds()))
            .wrap_err("invalid response embed")?
            .components(Some(builder.component_slice()))
            .wrap_err("invalid response components")?
            .await
            .wrap_err("failed to update interaction response")?
            .model()
            .await
            .wrap_err("failed to deserialize interaction response")?;

        Ok(SentMessage::from(&msg))
    }

    async fn delete_response(&self, token: &str) -> Result<()> {
        self.interaction()
            .delete_response(token)
            .await
            .wrap_err("failed to delete interaction response")?;

        Ok(())
    }

    async fn create_followup(
        &self,
        token: &str,
        builder: &MessageBuilder,
        ephemeral: bool,
    ) -> Result<SentMessage> {
        let interaction = self.interaction();
        let mut req = interaction.create_followup(token);

        if ephemeral {
            req = req.flags(MessageFlags::EPHEMERAL);
        }

        if let Some(ref content) = builder.content {
            req = req.content(content).wrap_err("invalid followup content")?;
        }

        if builder.embed.is_some() {
            req = req
                .embeds(builder.embeds())
                .wrap_err("invalid followup embed")?;
        }

        if let Some(ref components) = builder.components {
            req = req
                .components(components)
                .wrap_err("invalid followup components")?;
        }

        let msg = req
            .await
            .wrap_err("failed to create followup")?
            .model()
            .await
            .wrap_err("failed to deserialize followup")?;

        Ok(SentMessage::from(&msg))
    }

    async fn update_followup(
        &self,
        token: &str,
        message_id: Id<MessageMarker>,
        builder: &MessageBuilder,
    ) -> Result<SentMessage> {
        let msg = self
            .interaction()
            .update_followup(token, message_id)
            .content(builder.content.as_deref())
            .wrap_err("invalid followup content")?
            .embeds(Some(builder.embeds()))
            .wrap_err("invalid followup embed")?
            .components(Some(builder.component_slice()))
            .wrap_err("invalid followup components")?
            .await
            .wrap_err("failed to update followup")?
            .model()
            .await
            .wrap_err("failed to deserialize followup")?;

        Ok(SentMessage::from(&msg))
    }

    async fn delete_followup(&self, token: &str, message_id: Id<MessageMarker>) -> Result<()> {
        self.interaction()
            .delete_followup(token, message_id)
            .await
            .wrap_err("failed to delete followup")?;

        Ok(())
    }

    async fn commands(&self, scope: CommandScope) -> Result<Vec<RemoteCommand>> {
        let interaction = self.interaction();

        let res = match scope {
            CommandScope::Global => interaction.global_commands().await,
            CommandScope::Guild(guild_id) => interaction.guild_commands(guild_id).await,
        };

        let commands = res
            .wrap_err_with(|| format!("failed to get {scope} commands"))?
            .models()
            .await
            .wrap_err_with(|| format!("failed to deserialize {scope} commands"))?;

        Ok(commands.into_iter().map(RemoteCommand::from).collect())
    }

    async fn create_command(
        &self,
        scope: CommandScope,
        command: &RemoteCommand,
    ) -> Result<RemoteCommand> {
        let interaction = self.interaction();
        let name = command.name.as_str();

        let res = match (scope, command.kind) {
            (CommandScope::Global, CommandType::ChatInput) => interaction
                .create_global_command()
                .chat_input(name, &command.description)
                .wrap_err("invalid chat input command")?
                .command_options(&command.options)
                .wrap_err("invalid command options")?
                .await,
            (CommandScope::Global, CommandType::User) => interaction
                .create_global_command()
                .user(name)
                .wrap_err("invalid user command")?
                .await,
            (CommandScope::Global, CommandType::Message) => interaction
                .create_global_command()
                .message(name)
                .wrap_err("invalid message command")?
                .await,
            (CommandScope::Guild(guild_id), CommandType::ChatInput) => interaction
                .create_guild_command(guild_id)
                .chat_input(name, &command.description)
                .wrap_err("invalid chat input command")?
                .command_options(&command.options)
                .wrap_err("invalid command options")?
                .await,
            (CommandScope::Guild(guild_id), CommandType::User) => interaction
                .create_guild_command(guild_id)
                .user(name)
                .wrap_err("invalid user command")?
                .await,
            (CommandScope::Guild(guild_id), CommandType::Message) => interaction
                .create_guild_command(guild_id)
                .message(name)
                .wrap_err("invalid message command")?
                .await,
            (_, kind) => bail!("cannot create command `{name}` of kind {kind:?}"),
        };

        let created: TwilightCommand = res
            .wrap_err_with(|| format!("failed to create {scope} command `{name}`"))?
            .model()
            .await
            .wrap_err("failed to deserialize created command")?;

        Ok(RemoteCommand::from(created))
    }

    // Creating a command with an existing name overwrites it.
    async fn update_command(
        &self,
        scope: CommandScope,
        command: &RemoteCommand,
    ) -> Result<RemoteCommand> {
        self.create_command(scope, command).await
    }

    async fn delete_command(&self, scope: CommandScope, command: &RemoteCommand) -> Result<()> {
        let Some(command_id) = command.id else {
            bail!("cannot delete command `{}` without id", command.name);
        };

        let interaction = self.interaction();

        let res = match scope {
            CommandScope::Global => interaction.delete_global_command(command_id).await,
            CommandScope::Guild(guild_id) => {
                interaction.delete_guild_command(guild_id, command_id).await
            }
        };

        res.wrap_err_with(|| format!("failed to delete {scope} command `{}`", command.name))?;

        Ok(())
    }
}
