use serde_json::Value;

use vibelink_shared::error::ApiError;
use vibelink_shared::models::UserProfile;
use vibelink_shared::protocol::{
    LoginOutcome, LoginRequest, OtpRequest, OtpVerifyRequest, RegisterAck,
};

use crate::http::{ApiRequest, Attachment, MultipartForm};
use crate::session::SessionManager;

/// Sign-up form. Sent as multipart so the photo can ride along.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub age: u32,
    pub city: String,
    pub state: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub bio: Option<String>,
    pub hashtags: Vec<String>,
    pub profile_photo: Option<Attachment>,
}

impl Registration {
    pub fn into_form(self) -> MultipartForm {
        let mut form = MultipartForm::new()
            .text("first_name", self.first_name)
            .text("last_name", self.last_name)
            .text("username", self.username)
            .text("email", self.email)
            .text("password", self.password)
            .text("confirm_password", self.confirm_password)
            .text("age", self.age.to_string())
            .text("city", self.city)
            .text("state", self.state)
            .text_opt("latitude", self.latitude.map(|v| v.to_string()))
            .text_opt("longitude", self.longitude.map(|v| v.to_string()))
            .text_opt("bio", self.bio);
        // The register serializer takes a list field: one part per tag.
        for tag in self.hashtags {
            form = form.text("hashtags", tag);
        }
        if let Some(photo) = self.profile_photo {
            form = form.file("profile_photo", photo);
        }
        form
    }
}

/// Partial profile edit. Unset fields are left alone by the server.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<u32>,
    pub bio: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub hashtags: Option<Vec<String>>,
    pub profile_photo: Option<Attachment>,
}

impl ProfileUpdate {
    pub fn into_form(self) -> Result<MultipartForm, ApiError> {
        let hashtags = self
            .hashtags
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let mut form = MultipartForm::new()
            .text_opt("first_name", self.first_name)
            .text_opt("last_name", self.last_name)
            .text_opt("age", self.age.map(|a| a.to_string()))
            .text_opt("bio", self.bio)
            .text_opt("city", self.city)
            .text_opt("state", self.state)
            .text_opt("hashtags", hashtags);
        if let Some(photo) = self.profile_photo {
            form = form.file("profile_photo", photo);
        }
        Ok(form)
    }
}

pub async fn register(session: &SessionManager, registration: Registration) -> Result<RegisterAck, ApiError> {
    let request = ApiRequest::post("/api/auth/register/").multipart(registration.into_form());
    session.call_public(request).await
}

pub async fn login(session: &SessionManager, email: &str, password: &str) -> Result<LoginOutcome, ApiError> {
    let request = ApiRequest::post("/api/auth/login/").json(&LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    })?;
    let body: Value = session.call_public(request).await?;
    Ok(LoginOutcome::from_json(body)?)
}

pub async fn send_otp(session: &SessionManager, email: &str) -> Result<(), ApiError> {
    let request = ApiRequest::post("/api/auth/send-otp/").json(&OtpRequest {
        email: email.to_string(),
    })?;
    session.execute_public(request).await.map(|_| ())
}

pub async fn verify_otp(session: &SessionManager, email: &str, otp: &str) -> Result<(), ApiError> {
    let request = ApiRequest::post("/api/auth/verify-otp/").json(&OtpVerifyRequest {
        email: email.to_string(),
        otp: otp.to_string(),
    })?;
    session.execute_public(request).await.map(|_| ())
}

pub async fn fetch_user(session: &SessionManager) -> Result<UserProfile, ApiError> {
    session.call(ApiRequest::get("/api/auth/user/")).await
}

pub async fn update_profile(session: &SessionManager, update: ProfileUpdate) -> Result<UserProfile, ApiError> {
    let request = ApiRequest::patch("/api/auth/user/update/").multipart(update.into_form()?);
    session.call(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_repeats_hashtag_parts() {
        let form = Registration {
            username: "ana".into(),
            age: 27,
            hashtags: vec!["travel".into(), "music".into()],
            ..Default::default()
        }
        .into_form();
        let tags: Vec<&str> = form
            .fields
            .iter()
            .filter(|(k, _)| k == "hashtags")
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(tags, ["travel", "music"]);
        assert_eq!(form.field("age"), Some("27"));
        assert!(form.field("latitude").is_none());
    }

    #[test]
    fn profile_update_sends_hashtags_as_json_text() {
        let form = ProfileUpdate {
            bio: Some("hi".into()),
            hashtags: Some(vec!["art".into()]),
            ..Default::default()
        }
        .into_form()
        .unwrap();
        assert_eq!(form.field("hashtags"), Some(r#"["art"]"#));
        assert!(form.field("first_name").is_none());
        assert!(form.files.is_empty());
    }
}
