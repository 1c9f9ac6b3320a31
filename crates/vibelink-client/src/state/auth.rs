use vibelink_shared::error::{ApiError, FieldErrors};
use vibelink_shared::models::{AuthTokens, UserProfile};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub user: Option<UserProfile>,
    pub tokens: Option<AuthTokens>,
    pub is_loading: bool,
    pub error: Option<String>,
    /// Per-field messages from the last rejected form, verbatim.
    pub field_errors: FieldErrors,
    pub otp_sent: bool,
    pub otp_verified: bool,
    /// Email awaiting OTP verification after registration.
    pub pending_email: Option<String>,
    /// Stored credentials have been checked at startup.
    pub is_initialized: bool,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.tokens.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthAction {
    Pending,
    LoggedIn {
        user: Option<UserProfile>,
        tokens: AuthTokens,
    },
    Registered {
        email: String,
    },
    OtpSent {
        email: String,
    },
    OtpVerified,
    ProfileLoaded(UserProfile),
    Initialized {
        user: Option<UserProfile>,
        tokens: Option<AuthTokens>,
    },
    Failed(ApiError),
    ClearError,
    ClearOtp,
}

pub fn reduce(state: &mut AuthState, action: AuthAction) {
    match action {
        AuthAction::Pending => {
            state.is_loading = true;
            state.error = None;
            state.field_errors = FieldErrors::default();
        }
        AuthAction::LoggedIn { user, tokens } => {
            state.is_loading = false;
            state.tokens = Some(tokens);
            if user.is_some() {
                state.user = user;
            }
            state.is_initialized = true;
        }
        AuthAction::Registered { email } => {
            state.is_loading = false;
            state.otp_sent = true;
            state.otp_verified = false;
            state.pending_email = Some(email);
        }
        AuthAction::OtpSent { email } => {
            state.is_loading = false;
            state.otp_sent = true;
            state.pending_email = Some(email);
        }
        AuthAction::OtpVerified => {
            state.is_loading = false;
            state.otp_verified = true;
        }
        AuthAction::ProfileLoaded(user) => {
            state.is_loading = false;
            state.user = Some(user);
        }
        AuthAction::Initialized { user, tokens } => {
            state.user = user;
            state.tokens = tokens;
            state.is_loading = false;
            state.is_initialized = true;
        }
        AuthAction::Failed(error) => {
            state.is_loading = false;
            state.field_errors = match &error {
                ApiError::Validation(fields) => fields.clone(),
                _ => FieldErrors::default(),
            };
            state.error = Some(error.user_message());
        }
        AuthAction::ClearError => {
            state.error = None;
            state.field_errors = FieldErrors::default();
        }
        AuthAction::ClearOtp => {
            state.otp_sent = false;
            state.otp_verified = false;
            state.pending_email = None;
        }
    }
}
