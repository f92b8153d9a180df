//! Sign-in / sign-up panel

use crate::auth::{RegisterRequest, SessionStore, User};
use crate::cart::CartStore;
use crate::error::{Error, Result};
use crate::ui::Notifications;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

#[derive(Debug, Clone, Default)]
pub struct AuthForm {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Sign-in / sign-up form
pub struct AuthPanel {
    session: SessionStore,
    cart: CartStore,
    notifications: Notifications,
    mode: AuthMode,
    form: AuthForm,
}

impl AuthPanel {
    pub fn new(session: SessionStore, cart: CartStore, notifications: Notifications) -> Self {
        Self {
            session,
            cart,
            notifications,
            mode: AuthMode::default(),
            form: AuthForm::default(),
        }
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    /// Flip between login and register. The password never carries over.
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        };
        self.form.password.clear();
    }

    pub fn form(&self) -> &AuthForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut AuthForm {
        &mut self.form
    }

    pub fn current_user(&self) -> Option<User> {
        self.session.current_user()
    }

    /// Submit the form in the current mode
    pub async fn submit(&mut self) -> bool {
        if let Err(err) = self.validate() {
            self.notifications.report(&err);
            return false;
        }

        match self.mode {
            AuthMode::Login => {
                match crate::sign_in(&self.session, &self.cart, &self.form.email, &self.form.password)
                    .await
                {
                    Ok(user) => {
                        self.form.password.clear();
                        self.notifications
                            .success(format!("Welcome back, {}!", user.first_name));
                        true
                    }
                    Err(err) => {
                        self.notifications.report(&err);
                        false
                    }
                }
            }
            AuthMode::Register => {
                let request = RegisterRequest::new(
                    &self.form.email,
                    &self.form.password,
                    &self.form.first_name,
                    &self.form.last_name,
                );
                match self.session.register(&request).await {
                    Ok(_) => {
                        self.mode = AuthMode::Login;
                        self.form.password.clear();
                        self.notifications
                            .success("Account created. Please sign in.");
                        true
                    }
                    Err(err) => {
                        self.notifications.report(&err);
                        false
                    }
                }
            }
        }
    }

    pub fn logout(&mut self) {
        crate::sign_out(&self.session, &self.cart);
        self.form = AuthForm::default();
        self.notifications.info("Signed out");
    }

    fn validate(&self) -> Result<()> {
        if self.form.email.trim().is_empty() || self.form.password.is_empty() {
            return Err(Error::invalid_input("Email and password are required"));
        }
        if self.mode == AuthMode::Register
            && (self.form.first_name.trim().is_empty() || self.form.last_name.trim().is_empty())
        {
            return Err(Error::invalid_input("First and last name are required"));
        }
        Ok(())
    }
}
