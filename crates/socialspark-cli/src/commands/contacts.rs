//! Contact management commands for CLI.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use socialspark_core::contacts::parse_phone_number;
use socialspark_core::{Closeness, Config, Contact, ContactStore, DeviceContact};

#[derive(Subcommand)]
pub enum ContactsAction {
    /// List contacts
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a contact
    Add {
        /// First name
        first_name: String,
        /// Last name
        #[arg(default_value = "")]
        last_name: String,
        #[command(flatten)]
        fields: ContactFields,
    },
    /// Update a contact
    Update {
        /// Contact ID
        id: i64,
        /// New first name
        #[arg(long)]
        first_name: Option<String>,
        /// New last name
        #[arg(long)]
        last_name: Option<String>,
        #[command(flatten)]
        fields: ContactFields,
    },
    /// Import contacts picked from a device address book (JSON array)
    Import {
        /// Path to a JSON file of `{first_name, last_name, phone?, email?}` objects
        file: PathBuf,
    },
}

#[derive(Args)]
pub struct ContactFields {
    /// Phone number (formatting characters are ignored)
    #[arg(long)]
    phone: Option<String>,
    /// Email address
    #[arg(long)]
    email: Option<String>,
    /// Current closeness (index 0-5 or label, e.g. "friends")
    #[arg(long)]
    current: Option<Closeness>,
    /// Desired closeness (index 0-5 or label)
    #[arg(long)]
    desired: Option<Closeness>,
    /// Free-text description
    #[arg(long)]
    description: Option<String>,
}

impl ContactFields {
    fn apply(self, contact: &mut Contact) {
        if let Some(phone) = self.phone {
            contact.phone_number = parse_phone_number(&phone);
        }
        if let Some(email) = self.email {
            contact.email = Some(email);
        }
        if let Some(current) = self.current {
            contact.current_closeness = current;
        }
        if let Some(desired) = self.desired {
            contact.desired_closeness = desired;
        }
        if let Some(description) = self.description {
            contact.description = Some(description);
        }
    }
}

pub fn run(action: ContactsAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let store = ContactStore::new(super::gateway(&config)?, config.user.id.clone());
    let rt = super::runtime()?;

    match action {
        ContactsAction::List { json } => {
            let contacts = rt.block_on(store.list())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&contacts)?);
            } else if contacts.is_empty() {
                println!("No contacts.");
            } else {
                for c in &contacts {
                    print_contact(c);
                }
            }
        }
        ContactsAction::Add {
            first_name,
            last_name,
            fields,
        } => {
            let mut contact = Contact::new(first_name, last_name);
            fields.apply(&mut contact);
            let created = rt.block_on(store.create(&contact))?;
            println!("Contact created: {}", created.id.unwrap_or_default());
        }
        ContactsAction::Update {
            id,
            first_name,
            last_name,
            fields,
        } => {
            rt.block_on(store.list())?;
            let mut contact = store
                .get(id)
                .ok_or_else(|| format!("contact not found: {id}"))?;
            if let Some(first_name) = first_name {
                contact.first_name = first_name;
            }
            if let Some(last_name) = last_name {
                contact.last_name = last_name;
            }
            fields.apply(&mut contact);
            rt.block_on(store.update(&contact))?;
            println!("Contact updated: {id}");
        }
        ContactsAction::Import { file } => {
            let content = std::fs::read_to_string(&file)?;
            let picked: Vec<DeviceContact> = serde_json::from_str(&content)?;
            let summary = rt.block_on(store.merge_imported(&picked));
            println!(
                "Imported {} contact(s), {} failed",
                summary.created.len(),
                summary.failed
            );
        }
    }
    Ok(())
}

fn print_contact(c: &Contact) {
    let id = c.id.map(|id| id.to_string()).unwrap_or_else(|| "-".into());
    let marker = if c.wants_closer() { " *" } else { "" };
    println!(
        "{id:>5}  {:<24} {} -> {}{marker}",
        c.display_name(),
        c.current_closeness,
        c.desired_closeness
    );
}
