use serde::Deserialize;

// Payloads tolerate unknown fields: clients post whole Account/Message
// objects, ids included.

// -- Accounts --

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

// -- Messages --

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessageRequest {
    pub posted_by: Option<i64>,
    pub message_text: Option<String>,
    pub time_posted_epoch: Option<i64>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMessageRequest {
    pub message_text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_accepts_full_message_object() {
        let req: CreateMessageRequest = serde_json::from_str(
            r#"{"messageId":9,"postedBy":1,"messageText":"hi","timePostedEpoch":1669947792}"#,
        )
        .unwrap();
        assert_eq!(req.posted_by, Some(1));
        assert_eq!(req.message_text.as_deref(), Some("hi"));
        assert_eq!(req.time_posted_epoch, Some(1669947792));
    }

    #[test]
    fn login_request_accepts_missing_and_null_fields() {
        let req: LoginRequest = serde_json::from_str(r#"{"username":"alice"}"#).unwrap();
        assert_eq!(req.username.as_deref(), Some("alice"));
        assert_eq!(req.password, None);

        let req: LoginRequest =
            serde_json::from_str(r#"{"accountId":null,"username":null,"password":null}"#).unwrap();
        assert_eq!(req.username, None);
        assert_eq!(req.password, None);
    }
}
