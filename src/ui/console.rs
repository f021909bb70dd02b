//! Interactive console.
//!
//! Plays the view layer: shows the sign-in prompt or the user list
//! depending on the route, turns typed commands into controller intents,
//! and prints notifications as toasts.

use std::io::Write;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::app::events::{NotificationReceiver, Notifier};
use crate::app::routes::{Navigator, Route};
use crate::services::{
    AuthGateway, GatewayError, ListController, PageDelta, RecordGateway, Session, SessionGuard,
};
use crate::ui::commands::{Command, CommandHelp};
use crate::ui::table;
use crate::ui::toast::ToastQueue;

pub const SIGNED_IN: &str = "Signed in successfully";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const SIGN_IN_FAILED: &str = "Sign-in failed";

/// Navigator that records the current route.
#[derive(Debug)]
pub struct ConsoleNavigator {
    route: Mutex<Route>,
}

impl ConsoleNavigator {
    /// Creates a navigator starting at `route`.
    pub fn new(route: Route) -> Self {
        Self {
            route: Mutex::new(route),
        }
    }

    /// Returns the current route.
    pub fn current(&self) -> Route {
        *self.route.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Navigator for ConsoleNavigator {
    fn navigate(&self, route: Route) {
        tracing::debug!(%route, "Navigating");
        *self.route.lock().unwrap_or_else(|e| e.into_inner()) = route;
    }
}

/// What to do after a screen returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// The console front end.
pub struct Console<G: RecordGateway, A: AuthGateway> {
    gateway: Arc<G>,
    auth: Arc<A>,
    session: Arc<Session>,
    navigator: Arc<ConsoleNavigator>,
    notifier: Notifier,
    notifications: NotificationReceiver,
    toasts: ToastQueue,
}

impl<G: RecordGateway, A: AuthGateway> Console<G, A> {
    /// Creates a console starting at the root route.
    pub fn new(gateway: Arc<G>, auth: Arc<A>, session: Arc<Session>) -> Self {
        let (notifier, notifications) = Notifier::channel();
        Self {
            gateway,
            auth,
            session,
            navigator: Arc::new(ConsoleNavigator::new(Route::Root)),
            notifier,
            notifications,
            toasts: ToastQueue::default(),
        }
    }

    /// Runs until `quit` or end of input.
    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();
        loop {
            let route = self
                .navigator
                .current()
                .resolve(self.session.has_valid_session());
            self.navigator.navigate(route);

            let flow = match route {
                Route::Login => self.login_screen(&mut lines, out).await?,
                Route::Users | Route::Root => self.users_screen(&mut lines, out).await?,
            };
            if flow == Flow::Exit {
                return Ok(());
            }
        }
    }

    async fn login_screen<R, W>(&mut self, lines: &mut Lines<R>, out: &mut W) -> Result<Flow>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        self.flush_toasts(out)?;
        writeln!(out, "Sign in")?;
        write!(out, "Email: ")?;
        out.flush()?;
        let Some(email) = lines.next_line().await? else {
            return Ok(Flow::Exit);
        };
        write!(out, "Password: ")?;
        out.flush()?;
        let Some(password) = lines.next_line().await? else {
            return Ok(Flow::Exit);
        };

        match self.auth.login(email.trim(), &password).await {
            Ok(token) => {
                self.session.begin(token)?;
                self.notifier.success(SIGNED_IN);
                self.navigator.navigate(Route::Users);
            }
            Err(e) => {
                tracing::warn!("Sign-in failed: {}", e);
                let message = if e.is_unauthorized() || e == GatewayError::Status(400) {
                    INVALID_CREDENTIALS
                } else {
                    SIGN_IN_FAILED
                };
                self.notifier.error(message);
            }
        }
        Ok(Flow::Continue)
    }

    async fn users_screen<R, W>(&mut self, lines: &mut Lines<R>, out: &mut W) -> Result<Flow>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let controller = ListController::new(
            self.gateway.clone(),
            self.session.clone(),
            self.navigator.clone(),
            self.notifier.clone(),
        );
        controller.load_page(1).await;

        loop {
            self.flush_toasts(out)?;
            write!(out, "{}", table::render(&controller.snapshot().await))?;
            write!(out, "> ")?;
            out.flush()?;

            let Some(line) = lines.next_line().await? else {
                return Ok(Flow::Exit);
            };
            let command = match Command::parse(&line) {
                Ok(command) => command,
                Err(e) => {
                    writeln!(out, "{}", e)?;
                    continue;
                }
            };
            tracing::debug!(?command, "Command");

            match command {
                Command::NextPage => controller.change_page(PageDelta::Next).await,
                Command::PreviousPage => controller.change_page(PageDelta::Previous).await,
                Command::Reload => controller.refresh().await,
                Command::Search(term) => controller.set_search_term(term).await,
                Command::Edit(id) => controller.begin_edit(id).await,
                Command::Set(field, value) => controller.update_draft_field(field, value).await,
                Command::Save => controller.commit_edit().await,
                Command::Cancel => controller.cancel_edit().await,
                Command::Delete(id) => controller.delete_record(id).await,
                Command::Dismiss => self.toasts.dismiss(),
                Command::Logout => controller.sign_out(),
                Command::Help => writeln!(out, "{}", CommandHelp::render())?,
                Command::Quit => return Ok(Flow::Exit),
            }

            if self.navigator.current() != Route::Users {
                return Ok(Flow::Continue);
            }
        }
    }

    /// Moves pending notifications into toasts and prints them.
    fn flush_toasts<W: Write>(&mut self, out: &mut W) -> Result<()> {
        while let Ok(notification) = self.notifications.try_recv() {
            self.toasts.push(notification);
        }
        let rendered = self.toasts.render();
        if !rendered.is_empty() {
            write!(out, "{}", rendered)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use super::*;
    use crate::domain::fixtures::{record, sample_items};
    use crate::domain::{Page, RecordId};
    use crate::services::{MemoryTokenStore, MockAuthGateway, MockRecordGateway};

    fn session(token: Option<&str>) -> Arc<Session> {
        let store = match token {
            Some(token) => MemoryTokenStore::with_token(token),
            None => MemoryTokenStore::new(),
        };
        Arc::new(Session::restore(Arc::new(store)))
    }

    fn page_gateway() -> MockRecordGateway {
        let mut gateway = MockRecordGateway::new();
        gateway.expect_fetch_page().returning(|page| {
            let items = if page == 1 {
                sample_items()
            } else {
                vec![record(4, "Eve", "Holt", "eve.holt@reqres.in")]
            };
            Ok(Page {
                items,
                total_pages: 2,
            })
        });
        gateway
    }

    async fn run(
        gateway: MockRecordGateway,
        auth: MockAuthGateway,
        session: Arc<Session>,
        input: &str,
    ) -> String {
        let mut console = Console::new(Arc::new(gateway), Arc::new(auth), session);
        let mut out = Vec::new();
        console.run(input.as_bytes(), &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn signed_in_user_sees_the_list() {
        let out = run(
            page_gateway(),
            MockAuthGateway::new(),
            session(Some("t")),
            "next\nq\n",
        )
        .await;

        assert!(!out.contains("Sign in"));
        assert!(out.contains("George Bluth"));
        assert!(out.contains("Eve Holt"));
        assert!(out.contains("Page 2 of 2"));
    }

    #[tokio::test]
    async fn sign_in_then_list() {
        let mut auth = MockAuthGateway::new();
        auth.expect_login()
            .withf(|email, password| {
                email.to_string() == "eve.holt@reqres.in" && password.to_string() == "cityslicka"
            })
            .times(1)
            .returning(|_, _| Ok("QpwL5tke4Pnpja7X4".to_string()));
        let session = session(None);

        let out = run(
            page_gateway(),
            auth,
            session.clone(),
            " eve.holt@reqres.in \ncityslicka\nq\n",
        )
        .await;

        assert!(out.starts_with("Sign in\nEmail: Password: "));
        assert!(out.contains("[ok] Signed in successfully"));
        assert!(out.contains("George Bluth"));
        assert_eq!(session.token().as_deref(), Some("QpwL5tke4Pnpja7X4"));
    }

    #[tokio::test]
    async fn rejected_sign_in_stays_on_prompt() {
        let mut auth = MockAuthGateway::new();
        auth.expect_login()
            .times(1)
            .returning(|_, _| Err(GatewayError::Status(400)));
        // No fetch expectation: the list must not load.
        let out = run(
            MockRecordGateway::new(),
            auth,
            session(None),
            "nobody@example.com\nwrong\n",
        )
        .await;

        assert!(out.contains("[!!] Invalid credentials"));
        assert_eq!(out.matches("Sign in").count(), 2);
    }

    #[tokio::test]
    async fn logout_returns_to_sign_in() {
        let session = session(Some("t"));
        let out = run(page_gateway(), MockAuthGateway::new(), session.clone(), "logout\n").await;

        assert!(!session.has_valid_session());
        assert!(out.contains("Sign in"));
    }

    #[tokio::test]
    async fn edit_and_save() {
        let mut gateway = page_gateway();
        gateway
            .expect_update_record()
            .withf(|id, patch| *id == RecordId(2) && patch.email == "x@y.com")
            .times(1)
            .returning(|_, _| Ok(()));

        let out = run(
            gateway,
            MockAuthGateway::new(),
            session(Some("t")),
            "edit 2\nset email x@y.com\nsave\nq\n",
        )
        .await;

        assert!(out.contains("[Email: x@y.com]"));
        assert!(out.contains("[ok] User updated successfully"));
    }

    #[tokio::test]
    async fn delete_failure_is_a_toast() {
        let mut gateway = page_gateway();
        gateway
            .expect_delete_record()
            .with(eq(RecordId(1)))
            .times(1)
            .returning(|_| Err(GatewayError::Network("reset".into())));

        let out = run(gateway, MockAuthGateway::new(), session(Some("t")), "d 1\nq\n").await;

        assert!(out.contains("[!!] Failed to delete user"));
        assert_eq!(out.matches("George Bluth").count(), 2);
    }

    #[tokio::test]
    async fn bad_input_is_reported() {
        let out = run(
            page_gateway(),
            MockAuthGateway::new(),
            session(Some("t")),
            "edit x\nhelp\n",
        )
        .await;

        assert!(out.contains("`x` is not a user id"));
        assert!(out.contains("Filter this page by name or email"));
    }

    #[tokio::test]
    async fn dismiss_clears_toasts() {
        let mut gateway = page_gateway();
        gateway
            .expect_delete_record()
            .times(1)
            .returning(|_| Err(GatewayError::Network("reset".into())));

        let out = run(
            gateway,
            MockAuthGateway::new(),
            session(Some("t")),
            "d 1\nreload\ndismiss\nq\n",
        )
        .await;

        // Shown after `d 1` and again after `reload`, then gone.
        assert_eq!(out.matches("[!!] Failed to delete user").count(), 2);
    }

    #[tokio::test]
    async fn unauthorized_sign_in_is_invalid_credentials() {
        let mut auth = MockAuthGateway::new();
        auth.expect_login()
            .times(1)
            .returning(|_, _| Err(GatewayError::Unauthorized(401)));

        let out = run(MockRecordGateway::new(), auth, session(None), "a@b.c\npw\n").await;
        assert!(out.contains("[!!] Invalid credentials"));
    }

    #[tokio::test]
    async fn server_error_sign_in_is_generic_failure() {
        let mut auth = MockAuthGateway::new();
        auth.expect_login()
            .times(1)
            .returning(|_, _| Err(GatewayError::Status(503)));

        let out = run(MockRecordGateway::new(), auth, session(None), "a@b.c\npw\n").await;
        assert!(out.contains("[!!] Sign-in failed"));
    }

    #[test]
    fn navigator_records_route() {
        let navigator = ConsoleNavigator::new(Route::Root);
        navigator.navigate(Route::Login);
        assert_eq!(navigator.current(), Route::Login);
    }
}
