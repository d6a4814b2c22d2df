use std::env::{self, VarError};

const HELP: &str = include_str!("./cli-help.txt");

/// The variables the server reads, and whether their values must stay hidden.
const ENV_VARS: [(&str, bool); 11] = [
    ("RUST_LOG", false),
    ("KSS_HOST", false),
    ("KSS_PORT", false),
    ("KSS_DATABASE_URL", false),
    ("KSS_SETTINGS_FILE", false),
    ("KSS_ADMIN_API_KEY", true),
    ("KSS_SYNC_POLL_INTERVAL", false),
    ("KSS_UNICOMMERCE_TENANT", false),
    ("KSS_UNICOMMERCE_USERNAME", false),
    ("KSS_UNICOMMERCE_PASSWORD", true),
    ("KSS_UNICOMMERCE_CLIENT_ID", false),
];

/// The server has no command line options. Any argument prints the help text and the current environment, and
/// returns true so that `main` exits without starting the server.
pub fn handle_command_line_args() -> bool {
    if env::args().len() <= 1 {
        return false;
    }
    println!("\n{HELP}\n");
    println!("Current environment:");
    for (name, secret) in ENV_VARS {
        println!("  {name:<27} {}", describe_var(env::var(name), secret));
    }
    true
}

fn describe_var(value: Result<String, VarError>, secret: bool) -> String {
    match value {
        Ok(_) if secret => "(set, hidden)".into(),
        Ok(s) => s,
        Err(VarError::NotPresent) => "Not set".into(),
        Err(VarError::NotUnicode(_)) if secret => "Invalid value (hidden)".into(),
        Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
    }
}
