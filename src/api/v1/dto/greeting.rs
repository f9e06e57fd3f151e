use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct GreetingResponse {
    pub message: String,
    pub authenticated: bool,
}
