use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use belay::config::{ClientConfig, ConfigError};
use belay::net::{ApiClient, ApiError, ChannelId, HttpTransport, MessageId};
use belay::session::{FileTokenStore, SessionError, SessionStore};
use belay::state::reactions::{HAPPY, NEUTRAL, SAD};
use belay::state::{ChannelDirectory, FormError, HomeView, PageController, ProfileForm, RenameForm, Route, auth};
use belay::util::body::Body;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("not logged in; run `belay login` or `belay signup` first")]
    NotLoggedIn,
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("session storage failed: {0}")]
    Session(#[from] SessionError),
    #[error("request failed: {0}")]
    Api(#[from] ApiError),
    #[error("{0}")]
    Form(#[from] FormError),
    #[error("channel {0} not found")]
    UnknownChannel(ChannelId),
}

#[derive(Parser, Debug)]
#[command(name = "belay", about = "Belay chat client")]
struct Cli {
    #[arg(long, env = "BELAY_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, env = "BELAY_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new account with a server-chosen name.
    Signup,
    Login {
        username: String,
        password: String,
    },
    Logout,
    Whoami,
    Channels(ChannelsCommand),
    Unreads,
    Messages(MessagesCommand),
    Replies(RepliesCommand),
    React {
        message_id: MessageId,
        #[arg(value_enum)]
        reaction: Reaction,
    },
    Profile(ProfileCommand),
    /// Poll a channel (and optionally one thread) until Ctrl-C.
    Watch {
        channel_id: ChannelId,
        #[arg(long)]
        thread: Option<MessageId>,
    },
}

#[derive(Args, Debug)]
struct ChannelsCommand {
    #[command(subcommand)]
    command: ChannelsSubcommand,
}

#[derive(Subcommand, Debug)]
enum ChannelsSubcommand {
    List,
    Create,
    Rename { channel_id: ChannelId, name: String },
}

#[derive(Args, Debug)]
struct MessagesCommand {
    #[command(subcommand)]
    command: MessagesSubcommand,
}

#[derive(Subcommand, Debug)]
enum MessagesSubcommand {
    List { channel_id: ChannelId },
    Post { channel_id: ChannelId, body: String },
}

#[derive(Args, Debug)]
struct RepliesCommand {
    #[command(subcommand)]
    command: RepliesSubcommand,
}

#[derive(Subcommand, Debug)]
enum RepliesSubcommand {
    List { channel_id: ChannelId, message_id: MessageId },
    Post { channel_id: ChannelId, message_id: MessageId, body: String },
}

#[derive(Args, Debug)]
struct ProfileCommand {
    #[command(subcommand)]
    command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProfileSubcommand {
    Name { username: String },
    Password { password: String, confirm: String },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Reaction {
    Happy,
    Neutral,
    Sad,
}

impl Reaction {
    fn emoji(self) -> &'static str {
        match self {
            Self::Happy => HAPPY,
            Self::Neutral => NEUTRAL,
            Self::Sad => SAD,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("belay=info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url.trim_end_matches('/').to_owned();
    }
    if let Some(session_file) = cli.session_file {
        config.session_file = session_file;
    }

    let session = SessionStore::open(Arc::new(FileTokenStore::new(config.session_file.clone())))?;
    let api = ApiClient::new(Arc::new(HttpTransport::new(&config)?), session);

    match cli.command {
        Command::Signup => {
            auth::signup(&api).await?;
            println!("signed up");
            Ok(())
        }
        Command::Login { username, password } => {
            auth::login(&api, &username, &password).await?;
            println!("logged in as {username}");
            Ok(())
        }
        Command::Logout => {
            auth::logout(&api);
            println!("logged out");
            Ok(())
        }
        Command::Whoami => {
            if api.session().is_authenticated() {
                println!("logged in ({})", config.session_file.display());
            } else {
                println!("logged out");
            }
            Ok(())
        }
        command => {
            if !api.session().is_authenticated() {
                return Err(CliError::NotLoggedIn);
            }
            run_session_command(&api, &config, command).await
        }
    }
}

async fn run_session_command(api: &ApiClient, config: &ClientConfig, command: Command) -> Result<(), CliError> {
    match command {
        Command::Channels(channels) => run_channels(api, channels).await,
        Command::Unreads => {
            for (channel_id, count) in api.unread_counts().await? {
                println!("{channel_id}\t{count}");
            }
            Ok(())
        }
        Command::Messages(messages) => run_messages(api, messages).await,
        Command::Replies(replies) => run_replies(api, replies).await,
        Command::React { message_id, reaction } => {
            match api.react(message_id, reaction.emoji()).await? {
                Some(user) => println!("{user} reacted to {message_id}"),
                None => println!("already reacted to {message_id}"),
            }
            Ok(())
        }
        Command::Profile(profile) => run_profile(api, profile).await,
        Command::Watch { channel_id, thread } => run_watch(api, config, channel_id, thread).await,
        Command::Signup | Command::Login { .. } | Command::Logout | Command::Whoami => Ok(()),
    }
}

async fn run_channels(api: &ApiClient, channels: ChannelsCommand) -> Result<(), CliError> {
    let mut directory = ChannelDirectory::new(api.clone());
    match channels.command {
        ChannelsSubcommand::List => {
            directory.list().await?;
            for channel in directory.channels() {
                println!("{}\t{}", channel.id, channel.name);
            }
        }
        ChannelsSubcommand::Create => {
            directory.create().await?;
            for channel in directory.channels() {
                println!("{}\t{}", channel.id, channel.name);
            }
        }
        ChannelsSubcommand::Rename { channel_id, name } => {
            directory.list().await?;
            if directory.name(channel_id).is_none() {
                return Err(CliError::UnknownChannel(channel_id));
            }
            let mut form = RenameForm::new(directory, channel_id);
            form.name = name;
            form.submit().await?;
            println!("renamed {channel_id} to {}", form.name);
        }
    }
    Ok(())
}

async fn run_messages(api: &ApiClient, messages: MessagesCommand) -> Result<(), CliError> {
    match messages.command {
        MessagesSubcommand::List { channel_id } => {
            for message in api.messages(channel_id).await? {
                println!("#{} {}: {}  [{}]", message.id, message.author, render(message.body()), message.reply_label());
            }
        }
        MessagesSubcommand::Post { channel_id, body } => {
            api.post_message(channel_id, &body).await?;
            println!("posted to {channel_id}");
        }
    }
    Ok(())
}

async fn run_replies(api: &ApiClient, replies: RepliesCommand) -> Result<(), CliError> {
    match replies.command {
        RepliesSubcommand::List { channel_id, message_id } => {
            for reply in api.replies(message_id, channel_id).await? {
                println!("#{} {}: {}", reply.id, reply.author, render(reply.body()));
            }
        }
        RepliesSubcommand::Post { channel_id, message_id, body } => {
            api.post_reply(message_id, channel_id, &body).await?;
            println!("replied to {message_id}");
        }
    }
    Ok(())
}

async fn run_profile(api: &ApiClient, profile: ProfileCommand) -> Result<(), CliError> {
    let mut form = ProfileForm::new(api.clone());
    let notice = match profile.command {
        ProfileSubcommand::Name { username } => {
            form.username = username;
            form.update_username().await?
        }
        ProfileSubcommand::Password { password, confirm } => {
            form.password = password;
            form.confirm_password = confirm;
            form.update_password().await?
        }
    };
    println!("{notice}");
    Ok(())
}

// =============================================================================
// WATCH
// =============================================================================

async fn run_watch(
    api: &ApiClient,
    config: &ClientConfig,
    channel_id: ChannelId,
    thread: Option<MessageId>,
) -> Result<(), CliError> {
    let mut pages = PageController::start(api.clone(), config.poll).await;
    let Some(home) = pages.home_mut() else {
        return Err(CliError::NotLoggedIn);
    };
    if home.directory().name(channel_id).is_none() {
        return Err(CliError::UnknownChannel(channel_id));
    }
    home.select_channel(channel_id);
    if let Some(message_id) = thread {
        home.open_thread(message_id);
    }

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if pages.sync_session() || pages.route() != Route::Home {
                    return Err(CliError::NotLoggedIn);
                }
                if let Some(home) = pages.home() {
                    print_home(home).await;
                }
            }
            _ = &mut ctrl_c => {
                tracing::info!("watch stopped");
                return Ok(());
            }
        }
    }
}

async fn print_home(home: &HomeView) {
    let Some(pane) = home.messages() else {
        return;
    };
    let name = home.directory().name(pane.channel_id()).unwrap_or_default();
    let badge = home.unreads().badge(pane.channel_id()).await.unwrap_or_default();
    println!("== {name} {badge}");
    for message in pane.messages().await {
        println!("#{} {}: {}  [{}]", message.id, message.author, render(message.body()), message.reply_label());
    }
    if let Some(thread) = home.thread() {
        println!("-- replies to #{}", thread.message_id());
        for reply in thread.replies().await {
            println!("  #{} {}: {}", reply.id, reply.author, render(reply.body()));
        }
    }
}

fn render(body: Body<'_>) -> String {
    match body {
        Body::Image(url) => format!("[image {url}]"),
        Body::Text(text) => text.to_owned(),
    }
}
