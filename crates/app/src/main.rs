use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use progress_core::Progress;
use services::{AppServices, Clock, SessionController, SessionError, SessionOptions};
use storage::json::DEFAULT_FILE_NAME;
use tracing::info;
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

#[derive(Parser, Debug)]
#[command(name = "app", about = "Track progress through self-defined courses")]
struct Cli {
    /// JSON file holding every course and lesson.
    #[arg(long, env = "LEARN_DATA_FILE", default_value = DEFAULT_FILE_NAME, global = true)]
    data_file: PathBuf,

    /// Directory the dashboard writes CSV downloads into.
    #[arg(long, env = "LEARN_EXPORT_DIR", global = true)]
    export_dir: Option<PathBuf>,

    /// Mark today's date in the streak map whenever the catalog is saved.
    #[arg(long, env = "LEARN_RECORD_STREAK", global = true)]
    record_streak: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Command {
    /// Open the desktop dashboard (default).
    Ui,
    /// Print each course's progress.
    Progress,
    /// Write one course as CSV without opening the dashboard.
    Export {
        #[arg(long)]
        course: String,
        /// Output file; defaults to `learning_progress.csv` in the export directory.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

impl Cli {
    fn options(&self) -> SessionOptions {
        SessionOptions {
            record_streak: self.record_streak,
        }
    }

    fn resolved_export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }
}

struct DesktopApp {
    services: AppServices,
}

impl UiApp for DesktopApp {
    fn session(&self) -> Arc<SessionController> {
        self.services.session()
    }

    fn export_dir(&self) -> PathBuf {
        self.services.export_dir().to_path_buf()
    }
}

fn progress_line(title: &str, progress: &Progress) -> String {
    format!(
        "{title}: {:.0}% ({}/{} completed, {} needing revision)",
        progress.score * 100.0,
        progress.completed,
        progress.total,
        progress.needs_revision
    )
}

/// One summary line per course, in catalog order.
fn progress_report(session: &SessionController) -> Result<Vec<String>, SessionError> {
    let snapshot = session.snapshot()?;
    snapshot
        .catalog
        .course_titles()
        .map(|title| session.progress(title).map(|progress| progress_line(title, &progress)))
        .collect()
}

fn print_progress(session: &SessionController) -> Result<(), Box<dyn std::error::Error>> {
    let lines = progress_report(session)?;
    if lines.is_empty() {
        println!("No courses yet.");
    }
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

async fn export_course(
    session: &SessionController,
    export_dir: &Path,
    course: &str,
    out: Option<&Path>,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let export = session.export_csv(course)?;
    let path = match out {
        Some(path) => {
            export.write_to(path).await?;
            path.to_path_buf()
        }
        None => export.write_to_dir(export_dir).await?,
    };
    Ok(path)
}

fn launch_desktop(services: AppServices) {
    let app: Arc<dyn UiApp> = Arc::new(DesktopApp { services });
    let context = build_app_context(&app);

    // Some dev setups default the window to always-on-top.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Learning Dashboard")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let export_dir = cli.resolved_export_dir();
    info!(
        data_file = %cli.data_file.display(),
        export_dir = %export_dir.display(),
        record_streak = cli.record_streak,
        "starting"
    );
    let services = AppServices::new_json(
        &cli.data_file,
        export_dir.clone(),
        Clock::default_clock(),
        cli.options(),
    )
    .await?;

    match cli.command.unwrap_or(Command::Ui) {
        Command::Ui => {
            launch_desktop(services);
            Ok(())
        }
        Command::Progress => print_progress(&services.session()),
        Command::Export { course, out } => {
            let path =
                export_course(&services.session(), &export_dir, &course, out.as_deref()).await?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use progress_core::model::Lesson;

    #[test]
    fn defaults_to_ui_with_default_data_file() {
        let cli = Cli::try_parse_from(["app"]).unwrap();
        assert_eq!(cli.command, None);
        assert_eq!(cli.data_file, PathBuf::from(DEFAULT_FILE_NAME));
    }

    #[test]
    fn parses_export_with_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "app",
            "export",
            "--course",
            "Algebra",
            "--out",
            "out.csv",
            "--data-file",
            "data/catalog.json",
            "--record-streak",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Export {
                course: "Algebra".into(),
                out: Some(PathBuf::from("out.csv")),
            })
        );
        assert_eq!(cli.data_file, PathBuf::from("data/catalog.json"));
        assert!(cli.options().record_streak);
    }

    #[test]
    fn export_requires_course() {
        assert!(Cli::try_parse_from(["app", "export"]).is_err());
    }

    #[test]
    fn explicit_export_dir_wins() {
        let cli = Cli::try_parse_from(["app", "--export-dir", "/tmp/exports"]).unwrap();
        assert_eq!(cli.resolved_export_dir(), PathBuf::from("/tmp/exports"));
    }

    #[test]
    fn formats_progress_line() {
        let lessons = [
            Lesson::from_parts("Intro", true, false, ""),
            Lesson::from_parts("Equations", false, true, ""),
            Lesson::from_parts("Graphs", false, false, ""),
        ];
        assert_eq!(
            progress_line("Algebra", &Progress::from_lessons(&lessons)),
            "Algebra: 50% (1/3 completed, 1 needing revision)"
        );
    }

    #[tokio::test]
    async fn progress_report_reads_through_the_session() {
        let services = AppServices::from_storage(
            storage::Storage::in_memory(),
            PathBuf::from("."),
            progress_core::time::fixed_clock(),
            SessionOptions::default(),
        )
        .await
        .unwrap();
        let session = services.session();
        assert!(progress_report(&session).unwrap().is_empty());

        session.add_course("Algebra", "Intro\nGraphs").await.unwrap();
        session
            .update_lesson("Algebra", 0, progress_core::model::LessonEdit::Completed(true))
            .await
            .unwrap();
        session.add_course("Biology", "Cells").await.unwrap();

        assert_eq!(
            progress_report(&session).unwrap(),
            vec![
                "Algebra: 50% (1/2 completed, 0 needing revision)".to_string(),
                "Biology: 0% (0/1 completed, 0 needing revision)".to_string(),
            ]
        );
    }
}
