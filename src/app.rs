//! Main application orchestration and execution

use crate::{
    api::{HttpSpeedtestApi, SpeedtestApi},
    cli::{Cli, Command},
    config::{display_config_summary, load_config, EnvManager},
    error::{AppError, Result},
    logging::Logger,
    models::{Config, IntervalSetting},
    output::{OutputCoordinator, OutputFormatterFactory},
    types::ActionOutcome,
    ui::SpeedtestPage,
    utils::clock::{Clock, SystemClock},
};
use std::path::Path;
use std::sync::Arc;

/// What a command prints on stdout and whether it failed.
/// Banners explaining a failure are part of `output`.
#[derive(Debug)]
pub struct Execution {
    pub output: String,
    pub failure: Option<AppError>,
}

impl Execution {
    fn completed(output: String) -> Self {
        Self { output, failure: None }
    }

    fn from_outcome(outcome: ActionOutcome, output: String) -> Self {
        Self {
            output,
            failure: outcome.into_result().err(),
        }
    }

    pub fn into_result(self) -> Result<()> {
        match self.failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Main application struct that coordinates all components
pub struct App {
    config: Config,
    command: Command,
    api: Arc<dyn SpeedtestApi>,
    clock: Arc<dyn Clock>,
}

impl App {
    /// Load configuration from CLI, environment and `.env`, and connect to the backend
    pub fn new(cli: Cli) -> Result<Self> {
        let command = cli
            .command
            .clone()
            .ok_or_else(|| AppError::validation("No command given; try 'stdash --help'"))?;
        let config = load_config(cli)?;
        let api = Arc::new(HttpSpeedtestApi::from_config(&config)?);
        Ok(Self::with_api(config, command, api, Arc::new(SystemClock)))
    }

    /// Assemble from parts
    pub fn with_api(config: Config, command: Command, api: Arc<dyn SpeedtestApi>, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            command,
            api,
            clock,
        }
    }

    /// Run the command, print its output, then report any failure
    pub async fn run(self) -> Result<()> {
        let execution = self.execute().await?;
        if !execution.output.is_empty() {
            println!("{}", execution.output);
        }
        execution.into_result()
    }

    /// Run the command and return what it would print on stdout.
    /// `Err` means nothing was produced (setup or formatting failed).
    pub async fn execute(self) -> Result<Execution> {
        let logger = Logger::with_config("APP".to_string(), &self.config);

        if self.config.debug {
            logger
                .debug(&version_line())
                .field("git_commit", option_env!("GIT_COMMIT").unwrap_or("unknown"))
                .log()
                .await;
            logger.debug(&display_config_summary(&self.config)).log().await;
        }

        for warning in EnvManager::validate_current_env() {
            logger.warn(&warning).log().await;
        }

        let coordinator = OutputCoordinator::new(OutputFormatterFactory::create_formatter(
            self.config.enable_color,
            self.config.verbose,
        ));
        let mut page = SpeedtestPage::from_config(Arc::clone(&self.api), &self.config, Arc::clone(&self.clock))?;

        match self.command {
            Command::History => {
                let outcome = page.initialize().await;
                if outcome.is_success() {
                    return Ok(Execution::completed(coordinator.display_dashboard(page.dashboard())?));
                }
                let banners = coordinator.display_notifications(page.notifications())?;
                Ok(Execution::from_outcome(outcome, banners))
            }
            Command::Run => {
                let outcome = page.dashboard_mut().run_test().await;
                let mut sections = vec![coordinator.display_notifications(page.notifications())?];
                if outcome.is_success() {
                    sections.push(coordinator.display_dashboard(page.dashboard())?);
                }
                Ok(Execution::from_outcome(outcome, join_sections(&sections)))
            }
            Command::Interval { hours } => {
                let interval = IntervalSetting::new(hours);
                let mut sections = Vec::new();
                if !interval.is_within_bounds() {
                    sections.push(coordinator.display_warning(&format!(
                        "{} hours is outside the usual {}-{} range; sending it anyway",
                        hours,
                        IntervalSetting::MIN,
                        IntervalSetting::MAX
                    ))?);
                }

                page.settings_mut().set_value(interval);
                let outcome = page.settings().save_interval().await;
                sections.push(coordinator.display_notifications(page.notifications())?);
                Ok(Execution::from_outcome(outcome, join_sections(&sections)))
            }
            Command::Render { output } => {
                // A failed load still renders; the page carries the error banner
                if let ActionOutcome::Failed(error) = page.initialize().await {
                    logger.warn(&format!("Rendering without history: {}", error)).log().await;
                }
                let html = page.render_html();
                match output {
                    Some(path) => {
                        write_page(&path, &html)?;
                        Ok(Execution::completed(format!("Wrote {}", path.display())))
                    }
                    None => Ok(Execution::completed(html)),
                }
            }
        }
    }
}

/// `name vX.Y.Z (built <time>, <target>)`
fn version_line() -> String {
    format!(
        "{} v{} (built {}, {})",
        crate::PKG_NAME,
        crate::VERSION,
        option_env!("BUILD_TIME").unwrap_or("unknown"),
        option_env!("TARGET_TRIPLE").unwrap_or("unknown")
    )
}

fn write_page(path: &Path, html: &str) -> Result<()> {
    std::fs::write(path, html)
        .map_err(|e| AppError::io(format!("Failed to write {}: {}", path.display(), e)))
}

fn join_sections(sections: &[String]) -> String {
    sections
        .iter()
        .filter(|s| !s.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::test_support::{nyc_record, ScriptedApi};
    use crate::utils::clock::ManualClock;

    fn plain_config() -> Config {
        Config {
            enable_color: false,
            ..Config::default()
        }
    }

    fn app(command: Command, api: Arc<ScriptedApi>) -> App {
        App::with_api(plain_config(), command, api, Arc::new(ManualClock::default()))
    }

    #[test]
    fn test_version_line_names_build_target() {
        let line = version_line();
        assert!(line.starts_with(&format!("{} v{}", crate::PKG_NAME, crate::VERSION)));
        assert!(line.ends_with(&format!(", {})", option_env!("TARGET_TRIPLE").unwrap_or("unknown"))));
    }

    #[tokio::test]
    async fn test_history_prints_summary_and_table() {
        let api = Arc::new(ScriptedApi::new());
        api.push_history(Ok(vec![nyc_record()]));

        let output = app(Command::History, api).execute().await.unwrap().output;
        assert!(output.contains("Network Speed Test Results"));
        assert!(output.contains("Download: 93.21 Mbps"));
        assert!(output.contains("Server:   NYC-1"));
        assert!(output.contains("11.05"));
    }

    #[tokio::test]
    async fn test_history_failure_propagates() {
        let api = Arc::new(ScriptedApi::new());
        api.push_history(Err(AppError::api("database locked")));

        let execution = app(Command::History, api).execute().await.unwrap();
        assert_eq!(execution.output, "ERROR: Error loading speedtest data: database locked");
        let error = execution.into_result().unwrap_err();
        assert_eq!(error, AppError::api("database locked"));
        assert_eq!(error.exit_code(), 4);
    }

    #[tokio::test]
    async fn test_run_reports_banner_and_reloads() {
        let api = Arc::new(ScriptedApi::new());
        api.push_history(Ok(vec![nyc_record()]));

        let output = app(Command::Run, api.clone()).execute().await.unwrap().output;
        assert!(output.starts_with("SUCCESS: Speedtest completed successfully"));
        assert!(output.contains("NYC-1"));
        assert_eq!(api.calls(), vec!["run_test", "fetch_history"]);
    }

    #[tokio::test]
    async fn test_run_failure_is_an_error() {
        let api = Arc::new(ScriptedApi::new());
        api.push_run(Err(AppError::api("device busy")));

        let execution = app(Command::Run, api.clone()).execute().await.unwrap();
        assert_eq!(execution.output, "ERROR: Error running speedtest: device busy");
        assert_eq!(execution.failure, Some(AppError::api("device busy")));
        assert_eq!(api.calls(), vec!["run_test"]);
    }

    #[tokio::test]
    async fn test_interval_failure_keeps_warning_and_banner() {
        let api = Arc::new(ScriptedApi::new());
        api.push_interval(Err(AppError::api("out of range")));

        let execution = app(Command::Interval { hours: 0 }, api).execute().await.unwrap();
        assert!(execution.output.starts_with("WARNING: 0 hours is outside"));
        assert!(execution.output.ends_with("ERROR: Error updating interval: out of range"));
        assert!(execution.into_result().is_err());
    }

    #[tokio::test]
    async fn test_interval_out_of_range_warns_and_sends() {
        let api = Arc::new(ScriptedApi::new());

        let output = app(Command::Interval { hours: 48 }, api.clone()).execute().await.unwrap().output;
        assert!(output.starts_with("WARNING: 48 hours is outside"));
        assert!(output.ends_with("SUCCESS: Interval updated successfully"));
        assert_eq!(api.sent_intervals(), vec![IntervalSetting::new(48)]);
    }

    #[tokio::test]
    async fn test_render_to_file() {
        let api = Arc::new(ScriptedApi::new());
        api.push_history(Ok(vec![nyc_record()]));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");

        let output = app(Command::Render { output: Some(path.clone()) }, api).execute().await.unwrap().output;
        assert!(output.starts_with("Wrote "));

        let html = std::fs::read_to_string(path).unwrap();
        assert!(html.contains(r#"id="speedtest-chart""#));
        assert!(html.contains("NYC-1"));
    }

    #[tokio::test]
    async fn test_render_survives_load_failure() {
        let api = Arc::new(ScriptedApi::new());
        api.push_history(Err(AppError::network("connection refused")));

        let html = app(Command::Render { output: None }, api).execute().await.unwrap().output;
        assert!(html.contains("alert-danger"));
        assert!(html.contains("Error loading speedtest data: Network error: connection refused"));
    }
}
