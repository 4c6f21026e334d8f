use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "timequest", version, about = "TimeQuest: time management lessons for kids")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Coin balance
    Coins {
        #[command(subcommand)]
        action: commands::coins::CoinsAction,
    },
    /// Lesson catalog
    Lesson {
        #[command(subcommand)]
        action: commands::lesson::LessonAction,
    },
    /// Time Blocking lesson
    Blocking {
        #[command(subcommand)]
        action: commands::blocking::BlockingAction,
    },
    /// Weekly Schedule lesson
    Weekly {
        #[command(subcommand)]
        action: commands::weekly::WeeklyAction,
    },
    /// Prioritization lesson (Eisenhower matrix)
    Priority {
        #[command(subcommand)]
        action: commands::priority::PriorityAction,
    },
    /// Delegation lesson
    Delegate {
        #[command(subcommand)]
        action: commands::delegate::DelegateAction,
    },
    /// SMART Goals lesson
    Goals {
        #[command(subcommand)]
        action: commands::goals::GoalsAction,
    },
    /// Focus Quest mini-game
    Focus {
        #[command(subcommand)]
        action: commands::focus::FocusAction,
    },
    /// Calendar events
    Calendar {
        #[command(subcommand)]
        action: commands::calendar::CalendarAction,
    },
    /// To-do lists
    Todo {
        #[command(subcommand)]
        action: commands::todo::TodoAction,
    },
    /// Coins, upcoming deadlines and lessons at a glance
    Dashboard,
    /// AI study optimizer
    Study {
        #[command(subcommand)]
        action: commands::study::StudyAction,
    },
    /// One-time plans
    Pricing {
        #[arg(long)]
        json: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Session management
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TIMEQUEST_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Coins { action } => commands::coins::run(action),
        Commands::Lesson { action } => commands::lesson::run(action),
        Commands::Blocking { action } => commands::blocking::run(action),
        Commands::Weekly { action } => commands::weekly::run(action).await,
        Commands::Priority { action } => commands::priority::run(action),
        Commands::Delegate { action } => commands::delegate::run(action),
        Commands::Goals { action } => commands::goals::run(action).await,
        Commands::Focus { action } => commands::focus::run(action).await,
        Commands::Calendar { action } => commands::calendar::run(action),
        Commands::Todo { action } => commands::todo::run(action),
        Commands::Dashboard => commands::calendar::dashboard(),
        Commands::Study { action } => commands::study::run(action).await,
        Commands::Pricing { json } => commands::pricing::run(json),
        Commands::Config { action } => commands::config::run(action),
        Commands::Session { action } => commands::session::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "timequest", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
