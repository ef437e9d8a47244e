use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use swapthreads_core::{
    BorrowedRecord, ClothingItem, ExchangeStore, ItemKind, SwapError, SwapExchange,
};
use tracing::debug;

const MENU_WIDTH: usize = 48;

/// Interactive prompt/response front end over the exchange.
///
/// Reader and writer are injected so the loop can be driven by scripted
/// input in tests.
pub struct SwapApp<S: ExchangeStore, R, W> {
    exchange: SwapExchange<S>,
    input: R,
    output: W,
}

impl<S: ExchangeStore, R: BufRead, W: Write> SwapApp<S, R, W> {
    pub fn new(exchange: SwapExchange<S>, input: R, output: W) -> Self {
        Self {
            exchange,
            input,
            output,
        }
    }

    /// Tear down into the core handle and output sink.
    pub fn into_parts(self) -> (SwapExchange<S>, W) {
        (self.exchange, self.output)
    }

    /// Run the login menu, then the member menu until logout or exit.
    pub fn run(&mut self) -> Result<()> {
        let member_id = loop {
            self.show_login_menu()?;
            let choice = self.prompt("Select an option (1/2/3): ")?;
            match choice.as_str() {
                "1" => {
                    if let Some(id) = self.login()? {
                        break id;
                    }
                }
                "2" => {
                    if let Some(id) = self.register()? {
                        break id;
                    }
                }
                "3" => {
                    self.say("Goodbye!")?;
                    return Ok(());
                }
                _ => self.say("Invalid input.")?,
            }
        };

        loop {
            self.show_main_menu()?;
            let action = self.prompt("Choose an option: ")?;
            match action.as_str() {
                "1" => self.add_item()?,
                "2" => self.view_items()?,
                "3" => self.borrow_item(&member_id)?,
                "4" => self.return_item(&member_id)?,
                "5" => {
                    self.exchange.flush()?;
                    self.say("Logged out.")?;
                    return Ok(());
                }
                _ => self.say("Invalid input.")?,
            }
        }
    }

    fn login(&mut self) -> Result<Option<String>> {
        let member_id = self.prompt("Member ID: ")?;
        let password = self.prompt("Password: ")?;
        match self.exchange.login(&member_id, &password) {
            Ok(member) => {
                self.say(&format!("Welcome back, {}!", member.name))?;
                Ok(Some(member.member_id))
            }
            Err(err) => {
                self.report(err)?;
                Ok(None)
            }
        }
    }

    fn register(&mut self) -> Result<Option<String>> {
        let name = self.prompt("Enter your name: ")?;
        let member_id = self.prompt("Create a member ID: ")?;
        // Checked before the password prompt so a taken ID fails fast.
        if self.exchange.member(&member_id).is_some() {
            self.say("Member ID already exists.")?;
            return Ok(None);
        }
        let password = self.prompt("Create a password: ")?;
        match self.exchange.register(&member_id, &name, &password) {
            Ok(member) => {
                self.say("Registration successful.")?;
                Ok(Some(member.member_id))
            }
            Err(err) => {
                self.report(err)?;
                Ok(None)
            }
        }
    }

    fn add_item(&mut self) -> Result<()> {
        let kind_input = self.prompt("Add Topwear or Bottomwear? ")?;
        let kind = match kind_input.parse::<ItemKind>() {
            Ok(kind) => kind,
            Err(err) => return self.report(err),
        };
        let item_id = self.prompt("Enter item ID: ")?;
        let title = self.prompt("Enter title: ")?;
        let item = match self.read_item_fields(kind, item_id, title)? {
            Some(item) => item,
            None => return Ok(()),
        };
        match self.exchange.add_item(item) {
            Ok(()) => self.say("Item added successfully."),
            Err(err) => self.report(err),
        }
    }

    fn view_items(&mut self) -> Result<()> {
        if self.exchange.available_items().is_empty() {
            return self.say("No items available.");
        }
        self.say("\nAvailable Clothing Items:")?;
        self.list_catalog()
    }

    fn borrow_item(&mut self, member_id: &str) -> Result<()> {
        if self.exchange.available_items().is_empty() {
            return self.say("No items available to borrow.");
        }
        self.say("\nAvailable Items to Borrow:")?;
        self.list_catalog()?;

        let item_id = self.prompt("Enter item ID to borrow: ")?;
        match self.exchange.borrow_item(member_id, &item_id) {
            Ok(item) => self.say(&format!("You borrowed item {}", item.item_id())),
            Err(err) => self.report(err),
        }
    }

    fn return_item(&mut self, member_id: &str) -> Result<()> {
        let records = match self.exchange.borrowed_items(member_id) {
            Ok(records) => records,
            Err(err) => return self.report(err),
        };

        self.say("\nItems You've Borrowed:")?;
        for (index, record) in records.iter().enumerate() {
            self.say(&format!("{}. {}", index + 1, record.display_item()))?;
        }

        let selection = match self.prompt_number("Enter number of item to return: ")? {
            Some(value) => value as usize,
            None => return self.say("Invalid selection."),
        };

        // Legacy records carry only the ID; collect the rest before the
        // core completes the transfer.
        let replacement = match records.get(selection.wrapping_sub(1)) {
            Some(BorrowedRecord::Legacy(item_id)) => {
                let item_id = item_id.clone();
                match self.reenter_details(&item_id)? {
                    Some(item) => Some(item),
                    None => return Ok(()),
                }
            }
            _ => None,
        };

        match self.exchange.return_item(member_id, selection, replacement) {
            Ok(_) => self.say("Item returned."),
            Err(err) => self.report(err),
        }
    }

    fn reenter_details(&mut self, item_id: &str) -> Result<Option<ClothingItem>> {
        self.say("Re-enter item details for return:")?;
        let kind_input = self.prompt("Type (Topwear/Bottomwear): ")?;
        let kind = match kind_input.parse::<ItemKind>() {
            Ok(kind) => kind,
            Err(err) => {
                self.report(err)?;
                return Ok(None);
            }
        };
        let title = self.prompt("Title: ")?;
        self.read_item_fields(kind, item_id.to_string(), title)
    }

    fn read_item_fields(
        &mut self,
        kind: ItemKind,
        item_id: String,
        title: String,
    ) -> Result<Option<ClothingItem>> {
        let item = match kind {
            ItemKind::Topwear => {
                let brand = self.prompt("Brand: ")?;
                let size = self.prompt("Size: ")?;
                let color = self.prompt("Color: ")?;
                ClothingItem::Topwear {
                    title,
                    item_id,
                    brand,
                    size,
                    color,
                }
            }
            ItemKind::Bottomwear => {
                let waist_size = match self.prompt_number("Waist Size: ")? {
                    Some(value) => value,
                    None => return self.say("Invalid number.").map(|()| None),
                };
                let length = match self.prompt_number("Length: ")? {
                    Some(value) => value,
                    None => return self.say("Invalid number.").map(|()| None),
                };
                let material = self.prompt("Material: ")?;
                ClothingItem::Bottomwear {
                    title,
                    item_id,
                    waist_size,
                    length,
                    material,
                }
            }
        };
        Ok(Some(item))
    }

    fn list_catalog(&mut self) -> Result<()> {
        let lines: Vec<String> = self
            .exchange
            .available_items()
            .iter()
            .map(ToString::to_string)
            .collect();
        for line in lines {
            self.say(&line)?;
        }
        Ok(())
    }

    fn report(&mut self, err: SwapError) -> Result<()> {
        match err {
            SwapError::Storage(fatal) => Err(fatal),
            recoverable => {
                debug!("operation rejected: {recoverable}");
                self.say(user_message(&recoverable))
            }
        }
    }

    fn show_login_menu(&mut self) -> Result<()> {
        let rule = "=".repeat(MENU_WIDTH + 2);
        self.say(&rule)?;
        self.say(&boxed("SWAP THREADS"))?;
        self.say(&boxed("Borrow • Exchange • Return"))?;
        self.say(&rule)?;
        self.say(&boxed("1. Login"))?;
        self.say(&boxed("2. Register"))?;
        self.say(&boxed("3. Exit"))?;
        self.say(&rule)
    }

    fn show_main_menu(&mut self) -> Result<()> {
        let rule = "=".repeat(MENU_WIDTH + 2);
        self.say(&format!("\n{rule}"))?;
        self.say(&boxed("MAIN MENU"))?;
        self.say(&rule)?;
        self.say(&boxed("1. Add Item"))?;
        self.say(&boxed("2. View Items"))?;
        self.say(&boxed("3. Borrow Item"))?;
        self.say(&boxed("4. Return Item"))?;
        self.say(&boxed("5. Logout"))?;
        self.say(&rule)
    }

    fn prompt(&mut self, text: &str) -> Result<String> {
        write!(self.output, "{text}").context("failed to render prompt")?;
        self.output.flush().context("failed to flush prompt")?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read input")?;
        if read == 0 {
            bail!("input stream closed");
        }
        Ok(line.trim().to_string())
    }

    fn prompt_number(&mut self, text: &str) -> Result<Option<u32>> {
        let raw = self.prompt(text)?;
        Ok(raw.parse().ok())
    }

    fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{text}").context("failed to render output")?;
        Ok(())
    }
}

fn user_message(err: &SwapError) -> &'static str {
    match err {
        SwapError::DuplicateMember(_) => "Member ID already exists.",
        SwapError::InvalidCredentials => "Invalid credentials.",
        SwapError::InvalidVariant(_) => "Invalid type.",
        SwapError::ItemNotFound(_) => "Invalid item ID.",
        SwapError::NoBorrowedItems => "You have not borrowed any items.",
        SwapError::InvalidSelection | SwapError::MalformedRecord(_) => "Invalid selection.",
        SwapError::Storage(_) => "Storage failure.",
    }
}

fn boxed(text: &str) -> String {
    format!("|{text:^width$}|", width = MENU_WIDTH)
}
