//! Commands typed at the prompt.
//!
//! Each command maps to one user intent on the controller.

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the cached subscriptions.
    List,
    /// Show the known services.
    Services,
    /// Add a subscription. A registered name is picked, anything else is custom.
    Add {
        /// Service name (may contain spaces).
        service: String,
        /// End date as typed.
        end_date: String,
    },
    /// Renew the subscription at a list position or with an id.
    Renew(Target),
    /// Delete the subscription at a list position or with an id.
    Delete(Target),
    /// Reload from the store.
    Refresh,
    /// Run the expiring-soon check.
    Check,
    /// Hide the current status message.
    Dismiss,
    /// Show usage.
    Help,
    /// Leave.
    Quit,
}

/// Which subscription a command refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// 1-based position in the last listing.
    Position(usize),
    /// Store id.
    Id(String),
}

impl Target {
    fn parse(arg: &str) -> Self {
        match arg.parse::<usize>() {
            Ok(n) if n > 0 => Self::Position(n),
            _ => Self::Id(arg.to_string()),
        }
    }
}

/// Usage text.
pub const HELP: &str = "\
Commands:
  list                       show subscriptions
  services                   show known services
  add <service> <YYYY-MM-DD> add a subscription
  renew <#|id>               renew a subscription (asks for the new date)
  delete <#|id>              delete a subscription (asks for confirmation)
  refresh                    reload from the server
  check                      check for subscriptions expiring soon
  dismiss                    hide the current message
  help                       show this help
  quit                       exit";

impl Command {
    /// Parses one input line. Blank lines parse to `List`.
    ///
    /// # Errors
    ///
    /// Returns a usage hint when the line is not a known command.
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(Self::List);
        };
        let args: Vec<&str> = words.collect();

        match (verb.to_lowercase().as_str(), args.as_slice()) {
            ("list" | "ls", []) => Ok(Self::List),
            ("services", []) => Ok(Self::Services),
            ("add", [service @ .., end_date]) if !service.is_empty() => Ok(Self::Add {
                service: service.join(" "),
                end_date: (*end_date).to_string(),
            }),
            ("add", _) => Err("usage: add <service> <YYYY-MM-DD>".into()),
            ("renew", [target]) => Ok(Self::Renew(Target::parse(target))),
            ("renew", _) => Err("usage: renew <#|id>".into()),
            ("delete" | "rm", [target]) => Ok(Self::Delete(Target::parse(target))),
            ("delete" | "rm", _) => Err("usage: delete <#|id>".into()),
            ("refresh", []) => Ok(Self::Refresh),
            ("check", []) => Ok(Self::Check),
            ("dismiss", []) => Ok(Self::Dismiss),
            ("help" | "?", _) => Ok(Self::Help),
            ("quit" | "exit" | "q", _) => Ok(Self::Quit),
            (other, _) => Err(format!("unknown command `{other}`; type `help`")),
        }
    }
}
