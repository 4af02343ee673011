mod api;
mod session;
mod state;

use api::NotesApi;
use serde_json::to_string_pretty;
use session::Session;
use state::Event;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let addr =
        std::env::var("NOTES_SERVER_ADDR").unwrap_or_else(|_| "http://127.0.0.1:8000".to_string());
    let email =
        std::env::var("NOTES_USER_EMAIL").unwrap_or_else(|_| "demo@example.com".to_string());
    let other_email =
        std::env::var("NOTES_OTHER_EMAIL").unwrap_or_else(|_| "other@example.com".to_string());

    println!("Using notes server at {addr} as {email}\n");

    let mut session = Session::new(NotesApi::new(addr.clone(), email));
    let other = NotesApi::new(addr, other_email);

    // Load notes
    println!("1. Loading notes...");
    session.refresh().await;
    if let Some(error) = &session.state().error {
        return Err(error.clone().into());
    }
    println!("Notes: {}\n", to_string_pretty(&session.state().notes)?);

    // Create note
    println!("2. Creating a note...");
    session.dispatch(Event::Cancelled);
    session.dispatch(Event::TitleChanged("T1".to_string()));
    session.dispatch(Event::ContentChanged("C1".to_string()));
    session.add_note().await;
    let created = session
        .state()
        .notes
        .last()
        .cloned()
        .ok_or("note was not created")?;
    println!("Created note: {}\n", to_string_pretty(&created)?);

    // Another user cannot see it
    println!("3. Listing as another user...");
    let foreign = other.list().await?;
    println!(
        "Other user sees note {}: {}\n",
        created.id,
        foreign.iter().any(|note| note.id == created.id)
    );

    // Update note
    println!("4. Updating the note...");
    session.dispatch(Event::Selected(created.id));
    session.dispatch(Event::TitleChanged("T2".to_string()));
    session.dispatch(Event::ContentChanged("C2".to_string()));
    session.save_selected().await;
    println!("Notes: {}\n", to_string_pretty(&session.state().notes)?);

    // Another user cannot update it
    println!("5. Updating as another user...");
    match other.update(created.id, "X", "Y").await {
        Ok(_) => println!("Unexpectedly updated foreign note\n"),
        Err(e) => println!("Rejected: {e}\n"),
    }

    // Delete note
    println!("6. Deleting the note...");
    session.delete(created.id).await;
    session.refresh().await;
    println!("Notes after refresh: {}\n", to_string_pretty(&session.state().notes)?);

    Ok(())
}
