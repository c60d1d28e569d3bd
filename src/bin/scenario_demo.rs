use friendbook::application_port::*;
use friendbook::domain_model::*;
use friendbook::infra_memory::InMemoryUserRepo;
use friendbook::logger::*;
use friendbook::server::Server;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger(&LogConfig {
        filter: "debug".to_string(),
        format: LogFormat::Text,
    })?;

    let repo = Arc::new(InMemoryUserRepo::new());
    let server = Server::with_repo(repo.clone());
    let service = server.user_service.clone();

    let alice = service
        .create_user(NewUser {
            name: "Alice".to_string(),
            age: 30,
            friends: vec![],
        })
        .await?;
    info!(id = %alice.id, "created Alice");

    let bob = service
        .create_user(NewUser {
            name: "Bob".to_string(),
            age: 25,
            friends: vec![alice.id, UserId(99)],
        })
        .await?;
    info!(id = %bob.id, linked = ?bob.linked, "created Bob");
    for failure in &bob.failed {
        warn!(friend_id = %failure.friend_id, "{}", failure.error);
    }

    if let Err(e) = service
        .befriend(FriendRequest {
            source_id: alice.id,
            target_id: bob.id,
        })
        .await
    {
        info!("second befriend refused: {}", e);
    }

    let friends = service.list_friends(alice.id).await?;
    info!(?friends, "Alice's friends");

    service
        .update_age(AgeUpdate {
            user_id: bob.id,
            age: 26,
        })
        .await?;
    info!(bob = ?service.get_user(bob.id).await?, "after birthday");

    let name = service.delete_user(alice.id).await?;
    info!(rows = repo.friendship_rows(), "deleted {}", name);

    let friends = service.list_friends(bob.id).await?;
    info!(?friends, "Bob's friends");

    Ok(())
}
