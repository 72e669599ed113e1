//! The session report view: one in-memory session slot plus the roster it was
//! picked from, driven by file imports, backend loads and calendar selection.
//!
//! State lives in a [`tokio::sync::watch`] channel. Every operation replaces the
//! whole [`ViewState`] under the channel's lock, and backend loads are tagged
//! with a sequence number checked under that same lock, so a slow response can
//! never overwrite the result of a load started after it.

mod export;
mod state;

pub use export::{export_file_name, DirectorySink, ExportOutcome, ExportSkip, FileSink};
pub use state::{LoadOutcome, ViewState};

use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::future::Future;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::client::{BearerToken, CoachClient, ExportFormat};
use crate::config::Settings;
use crate::error::{ReportError, Result, ViewError};
use crate::models::SessionRecord;
use crate::report::{self, Rounding, SessionReport};

struct Backend {
    client: CoachClient,
    token: BearerToken,
}

pub struct SessionView {
    backend: Option<Backend>,
    settings: Settings,
    state: watch::Sender<ViewState>,
    /// Sequence number of the most recent load
    latest: AtomicU64,
}

impl SessionView {
    /// A view for previewing imported files only
    pub fn offline(settings: Settings) -> Self {
        Self::build(None, settings)
    }

    /// A view that can also load rosters and export through the backend
    pub fn connected(client: CoachClient, token: BearerToken, settings: Settings) -> Self {
        Self::build(Some(Backend { client, token }), settings)
    }

    fn build(backend: Option<Backend>, settings: Settings) -> Self {
        let (state, _) = watch::channel(ViewState::default());
        Self {
            backend,
            settings,
            state,
            latest: AtomicU64::new(0),
        }
    }

    /// Receive every state transition from now on
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    /// Current state
    pub fn snapshot(&self) -> ViewState {
        self.state.borrow().clone()
    }

    pub fn selected(&self) -> Option<Arc<SessionRecord>> {
        self.state.borrow().session.clone()
    }

    /// Derived report for the selected session
    pub fn report(&self, rounding: Rounding) -> Option<SessionReport> {
        self.selected()
            .map(|session| SessionReport::build(&session, rounding))
    }

    /// Days of the roster that have sessions
    pub fn session_days(&self) -> BTreeSet<NaiveDate> {
        self.state
            .borrow()
            .roster
            .as_ref()
            .map(|r| report::session_days(&r.sessions))
            .unwrap_or_default()
    }

    fn record_error(&self, err: ViewError) -> ReportError {
        self.state.send_modify(|s| s.error = Some(err.clone()));
        ReportError::View(err)
    }

    /// Import a session from a local `.json` file.
    ///
    /// Rejected or unreadable files set the error flag and leave the current
    /// session in place.
    pub async fn load_from_file(&self, path: &Path) -> Result<()> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.check_file_name(&file_name)?;

        match tokio::fs::read(path).await {
            Ok(contents) => self.load_from_bytes(&file_name, &contents),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Error reading file");
                Err(self.record_error(ViewError::UnreadableFile {
                    reason: e.to_string(),
                }))
            }
        }
    }

    /// Import a session from file contents supplied by the host
    pub fn load_from_bytes(&self, file_name: &str, contents: &[u8]) -> Result<()> {
        self.check_file_name(file_name)?;

        let session: SessionRecord = match serde_json::from_slice(contents) {
            Ok(session) => session,
            Err(e) => {
                warn!(file_name, error = %e, "Error reading JSON file");
                return Err(self.record_error(ViewError::UnreadableFile {
                    reason: e.to_string(),
                }));
            }
        };

        info!(
            file_name,
            session_id = ?session.session_id,
            samples = session.sample_count(),
            "Imported session"
        );

        let session = Arc::new(session);
        self.state.send_modify(|s| {
            // Anything still in flight is now older than this import.
            self.latest.fetch_add(1, Ordering::SeqCst);
            s.session = Some(session);
            s.error = None;
            s.loading = false;
        });
        Ok(())
    }

    fn check_file_name(&self, file_name: &str) -> Result<()> {
        if file_name.trim().is_empty() {
            return Err(self.record_error(ViewError::NoFileSelected));
        }
        if !has_json_extension(file_name) {
            warn!(file_name, "Unsupported file type");
            return Err(self.record_error(ViewError::UnsupportedFileType {
                file_name: file_name.to_string(),
            }));
        }
        Ok(())
    }

    fn backend(&self) -> Result<&Backend> {
        self.backend.as_ref().ok_or(ReportError::NotAuthenticated)
    }

    /// Run a backend call under the configured timeout; retries share it
    async fn with_deadline<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let deadline = self.settings.request_timeout;
        tokio::time::timeout(deadline, fut)
            .await
            .map_err(|_| ReportError::Timeout(deadline))?
    }

    /// Load an athlete's roster from the backend.
    ///
    /// The selection is cleared on success. On failure the previous roster and
    /// session stay visible and the error flag is set. A response that arrives
    /// after a newer load has started is dropped.
    pub async fn load_athlete(&self, athlete_id: &str) -> Result<LoadOutcome> {
        let backend = self.backend()?;

        let mut seq = 0;
        self.state.send_modify(|s| {
            seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
            s.loading = true;
            s.error = None;
        });
        debug!(athlete_id, seq, "Loading athlete");

        let result = self
            .with_deadline(backend.client.fetch_athlete(&backend.token, athlete_id))
            .await;

        let mut applied = false;
        let mut failure = None;
        self.state.send_if_modified(|s| {
            if self.latest.load(Ordering::SeqCst) != seq {
                return false;
            }
            applied = true;
            s.loading = false;
            match &result {
                Ok(roster) => {
                    s.roster = Some(Arc::new(roster.clone()));
                    s.session = None;
                    s.error = None;
                }
                Err(e) => {
                    let err = ViewError::FetchFailed {
                        reason: e.to_string(),
                    };
                    s.error = Some(err.clone());
                    failure = Some(err);
                }
            }
            true
        });

        if !applied {
            debug!(athlete_id, seq, "Dropping stale athlete response");
            return Ok(LoadOutcome::Stale);
        }

        match (result, failure) {
            (Ok(roster), _) => {
                info!(
                    athlete_id,
                    username = %roster.username,
                    sessions = roster.sessions.len(),
                    "Loaded athlete"
                );
                Ok(LoadOutcome::Applied)
            }
            (Err(e), Some(err)) => {
                error!(athlete_id, error = %e, "Error fetching athlete data");
                Err(ReportError::View(err))
            }
            (Err(e), None) => Err(e),
        }
    }

    /// Select the first roster session on `day`; no match clears the selection.
    ///
    /// Returns whether a session is now selected.
    pub fn select_day(&self, day: NaiveDate) -> bool {
        let mut selected = false;
        self.state.send_modify(|s| {
            s.session = s
                .roster
                .as_ref()
                .and_then(|r| report::session_on(&r.sessions, day))
                .map(|session| Arc::new(session.clone()));
            selected = s.session.is_some();
        });
        debug!(%day, selected, "Selected day");
        selected
    }

    /// Export the selected session through the backend and hand it to `sink`.
    ///
    /// Without a selected session nothing is requested or written. Failures set
    /// the error flag but keep the displayed session, unless a load or import
    /// started after the export has since replaced the state.
    pub async fn export(&self, format: ExportFormat, sink: &dyn FileSink) -> Result<ExportOutcome> {
        let Some(session) = self.selected() else {
            warn!(%format, "No session selected");
            return Ok(ExportOutcome::Skipped(ExportSkip::NoSession));
        };
        let Some(session_id) = session.session_id.clone() else {
            warn!(%format, "Selected session has no backend id");
            return Ok(ExportOutcome::Skipped(ExportSkip::MissingSessionId));
        };
        let backend = self.backend()?;

        let file_name = export_file_name(&session, format, &self.settings.date_format);
        let seq = self.latest.load(Ordering::SeqCst);
        info!(%session_id, %format, %file_name, "Exporting session");

        let result = async {
            let bytes = self
                .with_deadline(
                    backend
                        .client
                        .export_session(&backend.token, &session_id, format),
                )
                .await?;
            sink.save(&file_name, &bytes).await?;
            Ok::<_, ReportError>(bytes.len())
        }
        .await;

        match result {
            Ok(bytes) => Ok(ExportOutcome::Saved { file_name, bytes }),
            Err(e) => {
                error!(%session_id, %format, error = %e, "Error exporting session");
                let err = ViewError::ExportFailed {
                    reason: e.to_string(),
                };
                // A load or import started after this export owns the error flag.
                let flagged = self.state.send_if_modified(|s| {
                    if self.latest.load(Ordering::SeqCst) != seq {
                        return false;
                    }
                    s.error = Some(err.clone());
                    true
                });
                if !flagged {
                    debug!(%session_id, seq, "Newer load in place, export error not flagged");
                }
                Err(ReportError::View(err))
            }
        }
    }
}

/// Case-insensitive `.json` suffix check on a bare file name
fn has_json_extension(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("json"))
}
