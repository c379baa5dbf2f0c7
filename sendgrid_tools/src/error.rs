use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailerApiError {
    #[error("Email sending is disabled")]
    Disabled,
    #[error("Could not initialize the SendGrid API client. {0}")]
    Initialization(String),
    #[error("Error sending request to SendGrid. {0}")]
    RestResponseError(String),
    #[error("SendGrid returned an error. {status}: {message}")]
    QueryError { status: u16, message: String },
}
