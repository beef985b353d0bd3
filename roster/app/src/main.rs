use clap::{Args, Parser, Subcommand};
use roster_app::config::Config;
use roster_app::records::RecordStore;
use roster_app::session::{ProfileSession, RosterSession, TodoSession};
use roster_app::storage::FileStore;
use roster_core::{Major, Profile, ProfileEdit, RecordId, StatusFilter, StudentFields, StudentPatch};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Manage the student roster, the to-do list and the student profile form
#[derive(Parser, Debug)]
#[command(version)]
struct Cli {
    /// Configuration file to use instead of ./roster.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the stored records
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
enum Commands {
    /// Student roster
    #[command(subcommand)]
    Students(StudentCommands),
    /// To-do list
    #[command(subcommand)]
    Todos(TodoCommands),
    /// Single student profile form
    #[command(subcommand)]
    Profile(ProfileCommands),
}

#[derive(Debug, Clone, Subcommand)]
enum StudentCommands {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        grade: String,
        #[arg(long)]
        major: String,
    },
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        grade: Option<String>,
        #[arg(long)]
        major: Option<String>,
    },
    Remove {
        id: String,
    },
    List {
        /// Only show students whose name or major contains this text
        #[arg(long, default_value = "")]
        query: String,
    },
    /// Show the number of students per major
    Stats,
}

#[derive(Debug, Clone, Subcommand)]
enum TodoCommands {
    Add {
        title: String,
    },
    Edit {
        id: String,
        title: String,
    },
    Toggle {
        id: String,
    },
    Remove {
        id: String,
    },
    List {
        /// One of: all, active, completed
        #[arg(long, default_value = "all")]
        status: String,
    },
}

#[derive(Debug, Clone, Subcommand)]
enum ProfileCommands {
    Show,
    Set(ProfileArgs),
    Clear,
}

#[derive(Debug, Clone, Args)]
struct ProfileArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    age: Option<String>,
    #[arg(long)]
    class: Option<String>,
    #[arg(long)]
    major: Option<String>,
}

impl From<ProfileArgs> for ProfileEdit {
    fn from(args: ProfileArgs) -> Self {
        ProfileEdit {
            name: args.name,
            age: args.age,
            class: args.class,
            major: args.major,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(data_dir) = args.data_dir {
        config.storage.data_dir = data_dir;
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("Using data directory {}", config.storage.data_dir.display());
    let records = RecordStore::new(Arc::new(FileStore::new(&config.storage.data_dir)));

    match args.command {
        Commands::Students(command) => {
            let session = RosterSession::open(records, &config.storage.students_key).await;
            run_students(session, command).await
        }
        Commands::Todos(command) => {
            let session = TodoSession::open(records, &config.storage.todos_key).await;
            run_todos(session, command).await
        }
        Commands::Profile(command) => {
            let session = ProfileSession::open(records, &config.storage.profile_key).await;
            run_profile(session, command).await
        }
    }
}

async fn run_students(mut session: RosterSession, command: StudentCommands) -> anyhow::Result<()> {
    match command {
        StudentCommands::Add { name, grade, major } => {
            let fields = StudentFields { name, grade, major };
            session.try_update(|state| state.open_add().submit(fields))?;
            if let Some(student) = session.state().students.records().last() {
                println!("Student added with ID {}", student.id);
            }
        }
        StudentCommands::Edit {
            id,
            name,
            grade,
            major,
        } => {
            let id = RecordId::from(id);
            let patch = StudentPatch { name, grade, major };
            session.try_update(|state| state.edit(&id, patch))?;
        }
        StudentCommands::Remove { id } => {
            let id = RecordId::from(id);
            session.update(|state| state.request_delete(&id).confirm_delete());
        }
        StudentCommands::List { query } => {
            session.update(|state| state.search(query));
            let state = session.state();
            let visible = state.visible();
            println!("Students ({})", visible.len());
            for student in visible {
                println!(
                    "{}\t{}\t{}\t{}",
                    student.id, student.name, student.grade, student.major
                );
            }
        }
        StudentCommands::Stats => {
            let state = session.state();
            let counts = state.major_counts();
            println!("Total: {}", state.students.len());
            for major in Major::ALL {
                println!("{}: {}", major, counts.get(&major).copied().unwrap_or(0));
            }
        }
    }
    session.flush().await;
    Ok(())
}

async fn run_todos(mut session: TodoSession, command: TodoCommands) -> anyhow::Result<()> {
    match command {
        TodoCommands::Add { title } => {
            session.try_update(|state| state.add(title))?;
            if let Some(todo) = session.state().todos.records().last() {
                println!("Todo added with ID {}", todo.id);
            }
        }
        TodoCommands::Edit { id, title } => {
            let id = RecordId::from(id);
            session.try_update(|state| state.start_edit(&id).save_edit(title))?;
        }
        TodoCommands::Toggle { id } => {
            let id = RecordId::from(id);
            session.update(|state| state.toggle(&id));
        }
        TodoCommands::Remove { id } => {
            let id = RecordId::from(id);
            session.update(|state| state.delete(&id));
        }
        TodoCommands::List { status } => {
            let filter: StatusFilter = status.parse()?;
            session.update(|state| state.set_filter(filter));
            let state = session.state();
            println!("To-do ({} remaining)", state.remaining());
            for todo in state.visible() {
                let mark = if todo.completed { "x" } else { " " };
                println!("{}\t[{}] {}", todo.id, mark, todo.title);
            }
        }
    }
    session.flush().await;
    Ok(())
}

async fn run_profile(mut session: ProfileSession, command: ProfileCommands) -> anyhow::Result<()> {
    match command {
        ProfileCommands::Show => print_profile(session.state()),
        ProfileCommands::Set(args) => {
            let edit = ProfileEdit::from(args);
            session.submit(|profile| profile.with_edit(edit));
            print_profile(session.state());
        }
        ProfileCommands::Clear => {
            session.clear();
            println!("Profile cleared");
        }
    }
    session.flush().await;
    Ok(())
}

fn print_profile(profile: &Profile) {
    println!("Name: {}", profile.name);
    println!("Age: {}", profile.age);
    println!("Class: {}", profile.class);
    println!("Major: {}", profile.major);
}
