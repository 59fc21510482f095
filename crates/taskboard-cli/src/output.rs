use serde::Serialize;
use taskboard_sync::MoveOutcome;

#[derive(Serialize)]
pub struct CliResponse<T: Serialize> {
    pub success: bool,
    pub api_version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize)]
pub struct ListResponse<T: Serialize> {
    pub items: Vec<T>,
    pub count: usize,
}

#[derive(Serialize)]
struct MoveResponse<P: Serialize> {
    changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    plan: Option<P>,
}

fn render<T: Serialize>(response: &CliResponse<T>) -> String {
    serde_json::to_string(response).unwrap_or_else(|e| {
        format!(
            "{{\"success\":false,\"error\":\"Failed to encode response: {}\"}}",
            e
        )
    })
}

pub fn output_success<T: Serialize>(data: T) {
    let response = CliResponse {
        success: true,
        api_version: env!("CARGO_PKG_VERSION"),
        data: Some(data),
        error: None,
    };
    println!("{}", render(&response));
}

pub fn output_list<T: Serialize>(items: Vec<T>) {
    let count = items.len();
    output_success(ListResponse { items, count });
}

/// Print a drag outcome; refusals and rollbacks exit like any other error.
pub fn output_move<P: Serialize>(outcome: MoveOutcome<P>) {
    match outcome {
        MoveOutcome::Applied(plan) => output_success(MoveResponse {
            changed: true,
            plan: Some(plan),
        }),
        MoveOutcome::NoOp => output_success(MoveResponse::<P> {
            changed: false,
            plan: None,
        }),
        MoveOutcome::Forbidden => output_error("Permission denied: role cannot perform this move"),
        MoveOutcome::RolledBack(err) => output_error(&format!("Change rolled back: {}", err)),
    }
}

/// Print an error envelope to stderr and exit with status 1.
pub fn output_error(message: &str) -> ! {
    let response: CliResponse<()> = CliResponse {
        success: false,
        api_version: env!("CARGO_PKG_VERSION"),
        data: None,
        error: Some(message.to_string()),
    };
    eprintln!("{}", render(&response));
    std::process::exit(1);
}
