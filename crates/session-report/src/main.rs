use clap::{Parser, Subcommand};
use session_report::cli::{commands, OutputFormat};

#[derive(Parser)]
#[command(name = "session-report")]
#[command(author, version, about = "Training session reports for coaches and athletes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(short, long, global = true, default_value = "table")]
    format: OutputFormat,

    /// Profile to use
    #[arg(short, long, global = true, env = "SESSION_REPORT_PROFILE")]
    profile: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Authentication commands
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Preview a session file exported earlier
    Preview {
        /// Path to a .json session file
        file: String,
    },
    /// Coach view of an athlete's sessions
    Athlete {
        #[command(subcommand)]
        command: AthleteCommands,
    },
    /// User profile commands
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
}

#[derive(Subcommand)]
enum AuthCommands {
    /// Store a bearer token for the backend
    Login {
        /// Token to store; prompted for when omitted
        #[arg(short, long, env = "SESSION_REPORT_TOKEN")]
        token: Option<String>,
    },
    /// Logout and clear credentials
    Logout,
    /// Show authentication status
    Status,
}

#[derive(Subcommand)]
enum AthleteCommands {
    /// List session days and show one session
    Show {
        /// Athlete ID
        id: String,
        /// Date (YYYY-MM-DD) of the session to show
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Export the session of a day
    Export {
        /// Athlete ID
        id: String,
        /// Date (YYYY-MM-DD) of the session
        #[arg(short, long)]
        date: String,
        /// File format (pdf, json)
        #[arg(short = 't', long = "type", default_value = "pdf")]
        file_type: String,
        /// Output directory
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Show user profile
    Show,
    /// Update username, measurements or picture
    Update {
        #[arg(long)]
        username: Option<String>,
        /// Height in cm (cyclists only)
        #[arg(long)]
        height: Option<f64>,
        /// Weight in kg (cyclists only)
        #[arg(long)]
        weight: Option<f64>,
        /// Image file to upload as profile picture
        #[arg(long)]
        picture: Option<String>,
    },
}

#[tokio::main]
async fn main() -> session_report::Result<()> {
    let cli = Cli::parse();
    session_report::logging::init();

    let result = match cli.command {
        Commands::Auth { command } => match command {
            AuthCommands::Login { token } => commands::login(token, cli.profile).await,
            AuthCommands::Logout => commands::logout(cli.profile).await,
            AuthCommands::Status => commands::status(cli.profile).await,
        },
        Commands::Preview { file } => commands::preview_file(&file, cli.format).await,
        Commands::Athlete { command } => match command {
            AthleteCommands::Show { id, date } => {
                commands::show_athlete(&id, date, cli.format, cli.profile).await
            }
            AthleteCommands::Export {
                id,
                date,
                file_type,
                output,
            } => commands::export_session(&id, &date, &file_type, output, cli.profile).await,
        },
        Commands::Profile { command } => match command {
            ProfileCommands::Show => commands::show_profile(cli.format, cli.profile).await,
            ProfileCommands::Update {
                username,
                height,
                weight,
                picture,
            } => commands::update_profile(username, height, weight, picture, cli.profile).await,
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {}", session_report::error::format_user_error(&e));
        std::process::exit(1);
    }

    Ok(())
}
