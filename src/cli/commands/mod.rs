pub mod logging;
pub mod store;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

pub const ARG_USERNAME: &str = "username";
pub const ARG_EMAIL: &str = "email";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_TOKEN: &str = "token";

fn username_arg() -> Arg {
    Arg::new(ARG_USERNAME).help("Account username").required(true)
}

fn password_arg() -> Arg {
    Arg::new(ARG_PASSWORD)
        .short('p')
        .long("password")
        .help("Account password")
        .env("TOKENKEEPER_PASSWORD")
        .hide_env_values(true)
        .required(true)
}

fn token_command() -> Command {
    Command::new("token")
        .about("Manage a user's session token")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("create")
                .about("Issue a new token, replacing any existing one")
                .arg(username_arg()),
        )
        .subcommand(
            Command::new("get")
                .about("Print the user's current token")
                .arg(username_arg()),
        )
        .subcommand(
            Command::new("validate")
                .about("Check whether a token belongs to any user")
                .arg(Arg::new(ARG_TOKEN).help("Token to check").required(true)),
        )
        .subcommand(
            Command::new("revoke")
                .about("Clear the user's token")
                .arg(username_arg()),
        )
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let command = Command::new("tokenkeeper")
        .about("Credential and session-token authority")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(Command::new("schema").about("Create the users table if it does not exist"))
        .subcommand(
            Command::new("register")
                .about("Register a new user")
                .arg(username_arg())
                .arg(Arg::new(ARG_EMAIL).help("Account email").required(true))
                .arg(password_arg()),
        )
        .subcommand(
            Command::new("login")
                .about("Verify a user's password")
                .arg(username_arg())
                .arg(password_arg()),
        )
        .subcommand(token_command());

    let command = store::with_args(command);
    logging::with_args(command)
}
