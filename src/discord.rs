use super::*;

use async_trait::async_trait;
use serenity::builder::{
    CreateCommand, CreateCommandOption, CreateEmbed, CreateInteractionResponse,
    CreateInteractionResponseMessage, CreateMessage, GetMessages,
};
use serenity::client::{Client, Context as SerenityContext, EventHandler};
use serenity::http::Http;
use serenity::model::application::{
    Command, CommandDataOptionValue, CommandInteraction, CommandOptionType, Interaction,
};
use serenity::model::gateway::{GatewayIntents, Ready};
use serenity::model::id::GuildId;

pub(super) async fn run(state: Arc<AppState>) -> Result<()> {
    let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES;
    let token = state.config.token.clone();
    let mut client = Client::builder(&token, intents)
        .event_handler(Handler { state })
        .await
        .context("build Discord client")?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("ctrl-c received, shutting down");
            shard_manager.shutdown_all().await;
        }
    });

    client.start().await.context("Discord client stopped")
}

struct Handler {
    state: Arc<AppState>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: SerenityContext, ready: Ready) {
        info!("logged in as {}", ready.user.name);
        match register_commands(&ctx.http, self.state.config.guild_id).await {
            Ok(count) => info!("registered {} commands", count),
            Err(err) => error!("command registration failed: {:#}", err),
        }
    }

    async fn interaction_create(&self, ctx: SerenityContext, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };
        if let Err(err) = handle_interaction(&ctx, &self.state, &command).await {
            error!("/{} in channel {} failed: {:#}", command.data.name, command.channel_id, err);
        }
    }
}

async fn handle_interaction(
    ctx: &SerenityContext,
    state: &AppState,
    command: &CommandInteraction,
) -> Result<()> {
    let options = command_options(command);
    let Some(bot_command) = BotCommand::parse(&command.data.name, &options) else {
        debug!("ignoring unknown command /{}", command.data.name);
        return Ok(());
    };

    let channel = DiscordChannel {
        http: ctx.http.clone(),
        channel_id: command.channel_id,
    };
    let ack = InteractionAck {
        http: &ctx.http,
        command,
    };
    let today = current_date(&state.config);
    let result = dispatch_acknowledged(
        &ack,
        &state.store,
        command.channel_id,
        &channel,
        bot_command,
        today,
    )
    .await;

    match result? {
        Reply::Private(embed) => {
            let message = CreateInteractionResponseMessage::new()
                .embed(to_serenity_embed(&embed))
                .ephemeral(true);
            command
                .create_response(&ctx.http, CreateInteractionResponse::Message(message))
                .await
                .context("send private reply")?;
        }
        Reply::Silent => {}
    }
    Ok(())
}

/// Everything but help answers through the channel message, so those
/// interactions are deferred ephemerally and the deferral deleted afterwards.
struct InteractionAck<'a> {
    http: &'a Http,
    command: &'a CommandInteraction,
}

#[async_trait]
impl Acknowledge for InteractionAck<'_> {
    async fn acknowledge(&self) -> Result<()> {
        self.command
            .defer_ephemeral(self.http)
            .await
            .context("defer interaction")
    }

    async fn retract(&self) -> Result<()> {
        self.command
            .delete_response(self.http)
            .await
            .context("delete deferred response")
    }
}

fn command_options(command: &CommandInteraction) -> Vec<(String, OptionValue)> {
    command
        .data
        .options
        .iter()
        .filter_map(|option| {
            let value = match &option.value {
                CommandDataOptionValue::String(s) => OptionValue::String(s.clone()),
                CommandDataOptionValue::Integer(n) => OptionValue::Integer(*n),
                _ => return None,
            };
            Some((option.name.clone(), value))
        })
        .collect()
}

fn command_definitions() -> Vec<CreateCommand> {
    vec![
        CreateCommand::new("today")
            .description("Add a journal entry for today")
            .add_option(
                CreateCommandOption::new(CommandOptionType::String, "content", "Your journal content")
                    .required(true),
            ),
        CreateCommand::new("task")
            .description("Add or view tasks")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "content",
                    "Task to add (comma separated for multiple)",
                )
                .required(false),
            ),
        CreateCommand::new("done")
            .description("Complete a task")
            .add_option(
                CreateCommandOption::new(CommandOptionType::Integer, "number", "Task number to complete")
                    .required(true),
            ),
        CreateCommand::new("help").description("Show how to use the bot"),
    ]
}

async fn register_commands(http: &Http, guild_id: Option<u64>) -> Result<usize> {
    let commands = command_definitions();
    let registered = match guild_id {
        Some(guild_id) => GuildId::new(guild_id)
            .set_commands(http, commands)
            .await
            .with_context(|| format!("register commands in guild {}", guild_id))?,
        None => Command::set_global_commands(http, commands)
            .await
            .context("register global commands")?,
    };
    Ok(registered.len())
}

fn to_serenity_embed(embed: &Embed) -> CreateEmbed {
    CreateEmbed::new()
        .title(&embed.title)
        .description(&embed.description)
        .color(embed.color)
}

struct DiscordChannel {
    http: Arc<Http>,
    channel_id: ChannelId,
}

fn is_not_found(err: &serenity::Error) -> bool {
    match err {
        serenity::Error::Http(http_err) => http_err
            .status_code()
            .map(|status| status.as_u16() == 404)
            .unwrap_or(false),
        _ => false,
    }
}

#[async_trait]
impl ChannelApi for DiscordChannel {
    async fn delete_message(&self, message_id: MessageId) -> RetireOutcome {
        match self.channel_id.delete_message(&self.http, message_id).await {
            Ok(()) => RetireOutcome::Deleted,
            Err(err) if is_not_found(&err) => RetireOutcome::AlreadyGone,
            Err(err) => RetireOutcome::Failed(anyhow!(err).context("delete message")),
        }
    }

    async fn latest_message(&self) -> Result<Option<LatestMessage>> {
        let messages = self
            .channel_id
            .messages(&self.http, GetMessages::new().limit(1))
            .await
            .context("fetch latest message")?;
        Ok(messages.into_iter().next().map(|message| LatestMessage {
            id: message.id,
            is_reply: message.message_reference.is_some(),
        }))
    }

    async fn send(&self, embed: &Embed) -> Result<MessageId> {
        let sent = self
            .channel_id
            .send_message(&self.http, CreateMessage::new().embed(to_serenity_embed(embed)))
            .await
            .context("send message")?;
        Ok(sent.id)
    }

    async fn reply(&self, to: MessageId, embed: &Embed) -> Result<MessageId> {
        let builder = CreateMessage::new()
            .embed(to_serenity_embed(embed))
            .reference_message((self.channel_id, to));
        let sent = self
            .channel_id
            .send_message(&self.http, builder)
            .await
            .context("send reply")?;
        Ok(sent.id)
    }
}
