//! villa-cli - Scriptable access to the Villastay host inbox and guest reviews

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use libvillastay::api::mock::{fixtures, MockBookingApi};
use libvillastay::logging::{config_from_env, LoggingConfig};
use libvillastay::schema::{GuestReview, MessageEntry, ReviewCategory, ThreadEntry};
use libvillastay::service::inbox::InboxTab;
use libvillastay::service::review::{is_accepted_photo, ReviewForm};
use libvillastay::{Config, PageRequest, VillaError, VillaService};

#[derive(Parser, Debug)]
#[command(name = "villa-cli")]
#[command(version, about = "Host inbox and guest reviews from the command line")]
#[command(long_about = r#"Host inbox and guest reviews from the command line.

EXAMPLES:
    # Threads awaiting an answer
    villa-cli threads --tab inquiries

    # Newest page of a conversation, or all of it
    villa-cli messages bk-1002
    villa-cli messages bk-1002 --all --format json | jq '.[].body'

    # Reply (body from stdin when omitted)
    villa-cli send bk-1001 "The pool is heated from May"
    echo "See you tomorrow" | villa-cli send bk-1001

    # Drop the stored token
    villa-cli logout

    # Review a guest after checkout
    villa-cli review bk-0990 --accuracy 5 --cleanliness 5 --communication 4 \
        --location 5 --value 4 --content "Great guests, left everything tidy." \
        --photo a.jpg --photo b.jpg --photo c.jpg --photo d.png --photo e.png

EXIT CODES:
    0 - Success (including empty results)
    1 - Request or configuration error
    2 - Not signed in or authentication rejected
    3 - Invalid input (incomplete review, bad rating)
"#)]
struct Cli {
    /// Use built-in sample data instead of the backend
    #[arg(long, global = true)]
    demo: bool,

    /// Output format
    #[arg(short, long, default_value = "text", global = true)]
    #[arg(value_parser = ["text", "json"])]
    format: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List inbox threads for a tab
    Threads {
        /// inquiries, upcoming, past or support
        #[arg(short, long, default_value = "inquiries", value_parser = parse_tab)]
        tab: InboxTab,
    },

    /// Show a conversation, oldest message first
    Messages {
        booking_id: String,

        /// Page through the whole history instead of the newest page
        #[arg(long)]
        all: bool,
    },

    /// Send a message to the guest of a booking
    Send {
        booking_id: String,

        /// Message text (reads stdin if not provided)
        body: Option<String>,
    },

    /// Submit a guest review for a booking
    Review {
        booking_id: String,

        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        accuracy: u8,
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        cleanliness: u8,
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        communication: u8,
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        location: u8,
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        value: u8,

        /// Review text, 10 to 2000 characters
        #[arg(long)]
        content: String,

        /// JPEG or PNG photo; give exactly five
        #[arg(long = "photo", value_name = "PATH")]
        photos: Vec<PathBuf>,
    },

    /// Forget the stored bearer token
    Logout,
}

fn parse_tab(s: &str) -> std::result::Result<InboxTab, String> {
    s.parse::<InboxTab>().map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Quiet unless asked; stdout is for results
    let env = config_from_env();
    let level = std::env::var("VILLASTAY_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());
    // stderr cannot fail to open
    let _ = LoggingConfig::new(env.format, level, cli.verbose).init();

    tracing::debug!("villa-cli started with args: {:?}", cli);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code(&e));
    }
}

/// Library errors keep their exit code through the context chain
fn exit_code(error: &anyhow::Error) -> i32 {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<VillaError>())
        .map(VillaError::exit_code)
        .unwrap_or(1)
}

fn connect(demo: bool) -> Result<VillaService> {
    if demo {
        let mut config = Config::default_config();
        config.session.user_id = Some(fixtures::DEMO_HOST_ID.to_string());
        return Ok(VillaService::with_api(config, Arc::new(MockBookingApi::demo())));
    }
    VillaService::new().context("Failed to initialize client")
}

async fn run(cli: Cli) -> Result<()> {
    let service = connect(cli.demo)?;
    let json = cli.format == "json";

    match cli.command {
        Command::Threads { tab } => {
            sign_in(&service).await?;
            let threads = service
                .inbox()
                .threads(tab)
                .await
                .with_context(|| format!("Failed to load {} threads", tab))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&threads)?);
            } else {
                print!("{}", format_threads(&threads));
            }
        }
        Command::Messages { booking_id, all } => {
            sign_in(&service).await?;
            let messages = if all {
                service.inbox().load_all(&booking_id).await?.messages()
            } else {
                let mut page = service
                    .inbox()
                    .fetch_page(&booking_id, PageRequest::first())
                    .await?;
                page.sort_by(|a, b| a.sent_at.cmp(&b.sent_at).then_with(|| a.id.cmp(&b.id)));
                page
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&messages)?);
            } else {
                print!("{}", format_messages(&messages));
            }
        }
        Command::Send { booking_id, body } => {
            sign_in(&service).await?;
            let body = match body {
                Some(body) => body,
                None => {
                    let mut buffer = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buffer)
                        .context("Failed to read message from stdin")?;
                    strip_final_newline(buffer)
                }
            };

            let sent = service
                .inbox()
                .send(&booking_id, &body)
                .await
                .with_context(|| format!("Failed to send message to {}", booking_id))?;

            let Some(message) = sent else {
                return Err(VillaError::InvalidInput("Message is empty".to_string()).into());
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&message)?);
            } else {
                println!("Sent {}", message.id);
            }
        }
        Command::Review {
            booking_id,
            accuracy,
            cleanliness,
            communication,
            location,
            value,
            content,
            photos,
        } => {
            if let Some(path) = photos.iter().find(|p| !is_accepted_photo(p)) {
                bail!(VillaError::InvalidInput(format!(
                    "{} is not a JPEG or PNG file",
                    path.display()
                )));
            }

            let mut form = ReviewForm::new();
            let scores = [accuracy, cleanliness, communication, location, value];
            for (category, score) in ReviewCategory::ALL.into_iter().zip(scores) {
                form.set_rating(category, score)?;
            }
            form.set_content(&content);
            form.attach_photos(photos);

            let blockers = form.blockers();
            if !blockers.is_empty() {
                return Err(VillaError::InvalidInput(blockers.join("; ")).into());
            }

            sign_in(&service).await?;
            let booking = service
                .review()
                .load_booking(&booking_id)
                .await
                .with_context(|| format!("Failed to load booking {}", booking_id))?;
            let review = service
                .review()
                .submit(&booking, &form)
                .await
                .context("Failed to submit review")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&review)?);
            } else {
                println!("{}", format_review(&review));
            }
        }
        Command::Logout => {
            service.logout().context("Failed to log out")?;
            println!("Logged out");
        }
    }

    Ok(())
}

async fn sign_in(service: &VillaService) -> Result<()> {
    service
        .sign_in_configured()
        .await
        .context("Failed to sign in")?;
    Ok(())
}

/// Drop the newline a pipe or heredoc leaves behind; keep everything else
fn strip_final_newline(mut text: String) -> String {
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    text
}

fn format_threads(threads: &[ThreadEntry]) -> String {
    if threads.is_empty() {
        return "No threads\n".to_string();
    }

    let mut out = String::new();
    for thread in threads {
        out.push_str(&format!(
            "{} | {} | {} · {} | {} → {}",
            thread.booking_id,
            thread.status,
            thread.guest_name,
            thread.villa_title,
            thread.check_in,
            thread.check_out
        ));
        if thread.unread_count > 0 {
            out.push_str(&format!(" | {} unread", thread.unread_count));
        }
        out.push('\n');
        if !thread.last_message_snippet.is_empty() {
            out.push_str(&format!("  {}\n", thread.last_message_snippet));
        }
    }
    out
}

fn format_messages(messages: &[MessageEntry]) -> String {
    let mut out = String::new();
    for message in messages {
        let sender = match (&message.sender_name, message.is_from_host()) {
            (Some(name), _) => name.as_str(),
            (None, true) => "host",
            (None, false) => "guest",
        };
        out.push_str(&format!(
            "{} | {} | {}\n",
            message.sent_at.format("%Y-%m-%d %H:%M"),
            sender,
            message.body
        ));
    }
    out
}

fn format_review(review: &GuestReview) -> String {
    format!(
        "Submitted review {} for booking {} ({}/5)",
        review.id, review.booking_id, review.rating
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use libvillastay::schema::ThreadStatus;

    #[test]
    fn test_parse_threads_tab() {
        let cli = Cli::try_parse_from(["villa-cli", "threads", "--tab", "Past"]).unwrap();
        assert!(matches!(cli.command, Command::Threads { tab: InboxTab::Past }));
    }

    #[test]
    fn test_unknown_tab_rejected() {
        assert!(Cli::try_parse_from(["villa-cli", "threads", "--tab", "archive"]).is_err());
    }

    #[test]
    fn test_rating_out_of_range_rejected() {
        let result = Cli::try_parse_from([
            "villa-cli", "review", "bk-1", "--accuracy", "6", "--cleanliness", "5",
            "--communication", "5", "--location", "5", "--value", "5", "--content", "Lovely stay",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["villa-cli", "messages", "bk-1", "--all", "--demo", "-f", "json"]).unwrap();
        assert!(cli.demo);
        assert_eq!(cli.format, "json");
    }

    #[test]
    fn test_parse_logout() {
        let cli = Cli::try_parse_from(["villa-cli", "logout"]).unwrap();
        assert!(matches!(cli.command, Command::Logout));
    }

    #[test]
    fn test_strip_final_newline_keeps_inner_text() {
        assert_eq!(strip_final_newline("See you\n".to_string()), "See you");
        assert_eq!(strip_final_newline("  See you\r\n".to_string()), "  See you");
        assert_eq!(strip_final_newline("a\n\nb".to_string()), "a\n\nb");
    }

    #[test]
    fn test_format_empty_threads() {
        assert_eq!(format_threads(&[]), "No threads\n");
    }

    #[test]
    fn test_format_threads_shows_unread() {
        let text = format_threads(&[fixtures::thread("bk-1", ThreadStatus::Inquiry)]);
        assert!(text.starts_with("bk-1 | inquiry | Guest bk-1 · Casa Azul"));
        assert!(text.contains("1 unread"));
    }

    #[test]
    fn test_exit_code_survives_context() {
        let error = anyhow::Error::new(VillaError::InvalidInput("bad".to_string())).context("Failed to submit review");
        assert_eq!(exit_code(&error), 3);

        let error = anyhow::anyhow!("plain failure");
        assert_eq!(exit_code(&error), 1);
    }
}
