//! Command dispatch and result rendering.
//!
//! # Responsibility
//! - Wire configuration, logging and a store into a `UserService`.
//! - Translate each subcommand into one service call.
//! - Render results as JSON and map failures onto exit codes.

use crate::args::{Cli, Command};
use log::{error, info};
use serde_json::{json, Value};
use user_registry_core::db::open_db;
use user_registry_core::{
    init_logging_from_config, ErrorResponse, InMemoryUserStore, Operation, RegistryConfig,
    ResponseStatus, ServiceResult, SqliteUserStore, StoreError, UserCandidate, UserService,
    UserServiceError, UserStore,
};

pub const EXIT_OK: i32 = 0;
pub const EXIT_INTERNAL: i32 = 1;
pub const EXIT_INVALID_REQUEST: i32 = 2;
pub const EXIT_NOT_FOUND: i32 = 3;
pub const EXIT_CONFLICT: i32 = 4;

/// Successful command result.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutput {
    pub status: ResponseStatus,
    pub body: Option<Value>,
}

impl CommandOutput {
    fn new(status: ResponseStatus, body: Option<Value>) -> Self {
        Self { status, body }
    }
}

/// Runs one parsed invocation and returns the process exit code.
pub fn run(cli: Cli) -> i32 {
    let config = RegistryConfig::from_env()
        .with_db_path(cli.db.clone())
        .with_log_level(cli.log_level.clone())
        .with_log_dir(cli.log_dir.clone());

    if let Err(err) = init_logging_from_config(&config) {
        let body = ErrorResponse::new(ResponseStatus::InvalidRequest, err, cli.command.path());
        print_error(&body);
        return EXIT_INVALID_REQUEST;
    }

    info!(
        "event=cli_command module=cli status=start command={} in_memory={}",
        cli.command.name(),
        cli.in_memory
    );

    let result = if cli.in_memory {
        execute(&UserService::new(InMemoryUserStore::new()), &cli.command)
    } else {
        execute_on_sqlite(&config, &cli.command)
    };

    match result {
        Ok(output) => render_output(&cli.command, output),
        Err(err) => {
            let body = ErrorResponse::from_service_error(&err, cli.command.path());
            print_error(&body);
            exit_code(err.status())
        }
    }
}

fn execute_on_sqlite(config: &RegistryConfig, command: &Command) -> ServiceResult<CommandOutput> {
    let conn = open_db(config.resolved_db_path())
        .map_err(|err| UserServiceError::Internal(StoreError::from(err)))?;
    let store = SqliteUserStore::try_new(&conn).map_err(UserServiceError::Internal)?;
    execute(&UserService::new(store), command)
}

/// Executes one command against a service.
pub fn execute<S: UserStore>(
    service: &UserService<S>,
    command: &Command,
) -> ServiceResult<CommandOutput> {
    let output = match command {
        Command::List => {
            let users = service.list_users()?;
            CommandOutput::new(
                Operation::List.success_status(true),
                Some(json!(users)),
            )
        }
        Command::Get { id } => lookup_output(Operation::Get, service.get_user(*id)?),
        Command::Find { email } => {
            lookup_output(Operation::FindByEmail, service.find_user_by_email(email)?)
        }
        Command::Exists { email } => {
            let exists = service.email_exists(email)?;
            CommandOutput::new(
                Operation::Exists.success_status(true),
                Some(json!({ "exists": exists })),
            )
        }
        Command::Create(fields) => {
            let created = service.create_user(&UserCandidate::from(fields))?;
            CommandOutput::new(
                Operation::Create.success_status(true),
                Some(json!(created)),
            )
        }
        Command::Update { id, fields } => {
            let updated = service.update_user(*id, &UserCandidate::from(fields))?;
            CommandOutput::new(
                Operation::Update.success_status(true),
                Some(json!(updated)),
            )
        }
        Command::Delete { id } => {
            service.delete_user(*id)?;
            CommandOutput::new(Operation::Delete.success_status(true), None)
        }
    };
    Ok(output)
}

fn lookup_output<T: serde::Serialize>(operation: Operation, found: Option<T>) -> CommandOutput {
    let status = operation.success_status(found.is_some());
    CommandOutput::new(status, found.map(|value| json!(value)))
}

fn render_output(command: &Command, output: CommandOutput) -> i32 {
    if output.status == ResponseStatus::NotFound {
        let body = ErrorResponse::new(output.status, "user not found", command.path());
        print_error(&body);
        return EXIT_NOT_FOUND;
    }

    if let Some(body) = output.body {
        match serde_json::to_string_pretty(&body) {
            Ok(rendered) => println!("{rendered}"),
            Err(err) => {
                error!("event=cli_render module=cli status=error error={err}");
                return EXIT_INTERNAL;
            }
        }
    }
    EXIT_OK
}

fn print_error(body: &ErrorResponse) {
    match serde_json::to_string(body) {
        Ok(rendered) => eprintln!("{rendered}"),
        Err(_) => eprintln!("{}: {}", body.error, body.message),
    }
}

/// Exit code for a response status.
pub fn exit_code(status: ResponseStatus) -> i32 {
    match status {
        ResponseStatus::Ok | ResponseStatus::Created | ResponseStatus::NoContent => EXIT_OK,
        ResponseStatus::InvalidRequest => EXIT_INVALID_REQUEST,
        ResponseStatus::NotFound => EXIT_NOT_FOUND,
        ResponseStatus::Conflict => EXIT_CONFLICT,
        ResponseStatus::InternalError => EXIT_INTERNAL,
    }
}
