// UI layer: provides the interactive menus using `dialoguer`.
// The functions are small and synchronous to make the flow easy to follow.

use crate::store::{DeleteOutcome, EditField, Library, SearchCriterion};
use anyhow::Result;
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use dialoguer::{Confirm, Input, Select};
use std::io::{self, Write};
use tracing::{error, info};

/// Main interactive menu. Receives the `Library` store and runs a
/// select loop until the user chooses "Exit".
///
/// Note: `Select::interact()` is keyboard-driven: you can use arrow keys
/// and Enter to choose an option.
pub fn main_menu(library: &mut Library) -> Result<()> {
    loop {
        clear_screen()?;
        print_banner();
        let items = vec![
            "Add New Book",
            "View All Books",
            "Search Books",
            "Edit Book",
            "Delete Book",
            "Exit",
        ];
        let selection = Select::new().items(&items).default(0).interact()?;
        match selection {
            0 => handle_add(library)?,
            1 => handle_view_all(library)?,
            2 => handle_search(library)?,
            3 => handle_edit(library)?,
            4 => handle_delete(library)?,
            _ => break,
        }
    }

    clear_screen()?;
    println!("\nThank you for using the library catalog!");
    println!("Goodbye!\n");
    Ok(())
}

/// Collect the five fields for a new record, add it and persist.
/// The year prompt re-asks until the input parses as an integer, so a
/// typo never aborts the session.
fn handle_add(library: &mut Library) -> Result<()> {
    clear_screen()?;
    println!("\n=== Add New Book ===\n");

    let title: String = Input::new().with_prompt("Title").interact_text()?;
    let author: String = Input::new().with_prompt("Author").interact_text()?;
    let isbn: String = Input::new().with_prompt("ISBN").interact_text()?;
    let year: i32 = Input::new().with_prompt("Publication Year").interact_text()?;
    let category: String = Input::new().with_prompt("Category").interact_text()?;

    match library.add(title, author, isbn, year, category) {
        Ok(id) => {
            info!(id, "book added");
            println!("\n✓ Book added successfully with ID: {id}");
            persist(library);
        }
        Err(e) => println!("\nCould not add book: {e}"),
    }
    pause()
}

fn handle_view_all(library: &Library) -> Result<()> {
    clear_screen()?;
    println!("\n=== All Books in Library ===");

    if library.is_empty() {
        println!("\nNo books in the library yet!");
        return pause();
    }

    for book in library.books() {
        println!("{book}");
    }
    println!("\nTotal Books: {}", library.len());
    pause()
}

/// Sub-menu of the four search criteria, then the term prompt.
fn handle_search(library: &Library) -> Result<()> {
    clear_screen()?;
    println!("\n=== Search Books ===\n");

    let criteria = vec!["By ID", "By Title", "By Author", "By Category"];
    let choice = Select::new()
        .with_prompt("Search")
        .items(&criteria)
        .default(0)
        .interact()?;
    let criterion = match choice {
        0 => SearchCriterion::ById(Input::new().with_prompt("Book ID").interact_text()?),
        1 => SearchCriterion::TitleContains(Input::new().with_prompt("Title").interact_text()?),
        2 => SearchCriterion::AuthorContains(Input::new().with_prompt("Author").interact_text()?),
        _ => SearchCriterion::CategoryContains(
            Input::new().with_prompt("Category").interact_text()?,
        ),
    };

    let results = library.find(&criterion);
    if results.is_empty() {
        println!("\nNo books found!");
    } else {
        println!("\nFound {} book(s):", results.len());
        for book in results {
            println!("{book}");
        }
    }
    pause()
}

/// Look the record up, show it, then the six-target edit sub-menu.
fn handle_edit(library: &mut Library) -> Result<()> {
    clear_screen()?;
    println!("\n=== Edit Book ===\n");

    let id: u32 = Input::new().with_prompt("Book ID to edit").interact_text()?;
    match library.get(id) {
        Some(book) => println!("{book}"),
        None => {
            println!("\nBook not found!");
            return pause();
        }
    }

    let targets = vec!["Title", "Author", "ISBN", "Year", "Category", "Edit All"];
    let choice = Select::new()
        .with_prompt("What do you want to edit?")
        .items(&targets)
        .default(0)
        .interact()?;
    let field = match choice {
        0 => EditField::Title(Input::new().with_prompt("New Title").interact_text()?),
        1 => EditField::Author(Input::new().with_prompt("New Author").interact_text()?),
        2 => EditField::Isbn(Input::new().with_prompt("New ISBN").interact_text()?),
        3 => EditField::Year(Input::new().with_prompt("New Year").interact_text()?),
        4 => EditField::Category(Input::new().with_prompt("New Category").interact_text()?),
        _ => EditField::All {
            title: Input::new().with_prompt("New Title").interact_text()?,
            author: Input::new().with_prompt("New Author").interact_text()?,
            isbn: Input::new().with_prompt("New ISBN").interact_text()?,
            year: Input::new().with_prompt("New Year").interact_text()?,
            category: Input::new().with_prompt("New Category").interact_text()?,
        },
    };

    if library.edit(id, field) {
        info!(id, "book updated");
        println!("\n✓ Book updated successfully!");
        persist(library);
    } else {
        println!("\nBook not found!");
    }
    pause()
}

/// Look the record up, show it, ask for confirmation, then delete.
fn handle_delete(library: &mut Library) -> Result<()> {
    clear_screen()?;
    println!("\n=== Delete Book ===\n");

    let id: u32 = Input::new()
        .with_prompt("Book ID to delete")
        .interact_text()?;
    match library.get(id) {
        Some(book) => println!("{book}"),
        None => {
            println!("\nBook not found!");
            return pause();
        }
    }

    let confirmed = Confirm::new()
        .with_prompt("Are you sure you want to delete this book?")
        .default(false)
        .interact()?;
    match library.delete(id, confirmed) {
        DeleteOutcome::Deleted => {
            info!(id, "book deleted");
            println!("\n✓ Book deleted successfully!");
            persist(library);
        }
        DeleteOutcome::Cancelled => println!("\nDeletion cancelled."),
        DeleteOutcome::NotFound => println!("\nBook not found!"),
    }
    pause()
}

/// Persist after a successful mutation. A write failure is reported
/// and logged but keeps the session running with the in-memory state.
fn persist(library: &Library) {
    match library.save() {
        Ok(()) => println!("✓ Data saved successfully!"),
        Err(e) => {
            error!(error = %e, "saving catalog failed");
            println!("Warning: could not save data: {e}");
        }
    }
}

/// "Press Enter to continue..." acknowledgment after each operation.
fn pause() -> Result<()> {
    print!("\nPress Enter to continue...");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(())
}

fn clear_screen() -> Result<()> {
    execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0))?;
    Ok(())
}

fn print_banner() {
    println!("===========================================");
    println!("    LIBRARY MANAGEMENT SYSTEM");
    println!("===========================================");
    println!();
}
