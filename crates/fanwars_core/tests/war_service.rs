use fanwars_core::db::open_db_in_memory;
use fanwars_core::ranking::is_comment_ordered;
use fanwars_core::{
    popular_rivalries, RepoError, SqliteStore, Store, VoteDirection, WarService,
};
use uuid::Uuid;

#[test]
fn trending_is_the_active_subset_of_the_feed_in_feed_order() {
    let conn = open_db_in_memory().unwrap();
    let service = WarService::new(SqliteStore::try_new(&conn).unwrap());

    let quiet = service.create_war("MI", "CSK").unwrap();
    let busy = service.create_war("Dhoni", "Kohli").unwrap();
    let mild = service.create_war("RCB", "KKR").unwrap();
    for text in ["one", "two", "three"] {
        service.comments().create_comment(busy.id, text).unwrap();
    }
    service.comments().create_comment(mild.id, "only one").unwrap();

    let feed = service.feed().unwrap();
    let trending = service.trending().unwrap();

    let expected: Vec<Uuid> = feed
        .iter()
        .filter(|war| war.total_comments > 0)
        .map(|war| war.id)
        .collect();
    let actual: Vec<Uuid> = trending.iter().map(|entry| entry.war.id).collect();
    assert_eq!(actual, expected);
    assert_eq!(actual, vec![busy.id, mild.id]);
    assert_eq!(
        trending.iter().map(|entry| entry.rank).collect::<Vec<_>>(),
        vec![1, 2]
    );
    assert!(!actual.contains(&quiet.id));
}

#[test]
fn open_thread_loads_war_and_ordered_comments() {
    let conn = open_db_in_memory().unwrap();
    let service = WarService::new(SqliteStore::try_new(&conn).unwrap());
    let war = service.create_war("Virat", "Rohit").unwrap();
    let first = service.comments().create_comment(war.id, "first").unwrap();
    let second = service.comments().create_comment(war.id, "second").unwrap();
    service.comments().adjust_votes(first.id, 2).unwrap();

    let thread = service.open_thread(war.id).unwrap().unwrap();
    assert_eq!(thread.war().id, war.id);
    assert_eq!(thread.war().total_comments, 2);
    assert_eq!(thread.comments()[0].id, first.id);
    assert_eq!(thread.comments()[1].id, second.id);
}

#[test]
fn open_thread_for_unknown_war_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = WarService::new(SqliteStore::try_new(&conn).unwrap());

    let err = service.open_thread(Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[test]
fn post_comment_updates_local_thread_and_counter() {
    let conn = open_db_in_memory().unwrap();
    let service = WarService::new(SqliteStore::try_new(&conn).unwrap());
    let war = service.create_war("Punjab", "Rajasthan").unwrap();
    let liked = service.comments().create_comment(war.id, "liked").unwrap();
    service.comments().adjust_votes(liked.id, 5).unwrap();
    let mut thread = service.open_thread(war.id).unwrap().unwrap();

    let posted = thread
        .post_comment(service.comments(), "  fresh take  ")
        .unwrap();

    assert_eq!(posted.content, "fresh take");
    assert_eq!(thread.war().total_comments, 2);
    assert_eq!(thread.comments().len(), 2);
    assert_eq!(thread.comments()[1].id, posted.id);
    assert!(is_comment_ordered(thread.comments()));
}

#[test]
fn failed_post_leaves_thread_untouched() {
    let conn = open_db_in_memory().unwrap();
    let service = WarService::new(SqliteStore::try_new(&conn).unwrap());
    let war = service.create_war("CSK", "RCB").unwrap();
    let mut thread = service.open_thread(war.id).unwrap().unwrap();
    let before = thread.clone();

    assert!(thread.post_comment(service.comments(), "   ").is_err());
    assert_eq!(thread, before);
}

#[test]
fn vote_uses_store_score() {
    let conn = open_db_in_memory().unwrap();
    let service = WarService::new(SqliteStore::try_new(&conn).unwrap());
    let war = service.create_war("CSK", "RCB").unwrap();
    let comment = service.comments().create_comment(war.id, "up me").unwrap();
    let mut thread = service.open_thread(war.id).unwrap().unwrap();

    // Someone else voted after this thread was loaded.
    service.comments().adjust_votes(comment.id, 1).unwrap();

    let votes = thread
        .vote(service.comments(), comment.id, VoteDirection::Up)
        .unwrap();
    assert_eq!(votes, 2);
    assert_eq!(thread.comment(comment.id).unwrap().votes, 2);
}

#[test]
fn vote_overwrite_discards_votes_cast_since_load() {
    let conn = open_db_in_memory().unwrap();
    let service = WarService::new(SqliteStore::try_new(&conn).unwrap());
    let war = service.create_war("CSK", "RCB").unwrap();
    let comment = service.comments().create_comment(war.id, "stale").unwrap();
    let mut thread = service.open_thread(war.id).unwrap().unwrap();

    service.comments().adjust_votes(comment.id, 1).unwrap();

    let votes = thread
        .vote_overwrite(service.comments(), comment.id, VoteDirection::Down)
        .unwrap();
    assert_eq!(votes, -1);

    service.refresh_thread(&mut thread).unwrap();
    assert_eq!(thread.comment(comment.id).unwrap().votes, -1);
}

#[test]
fn vote_overwrite_requires_comment_in_thread() {
    let conn = open_db_in_memory().unwrap();
    let service = WarService::new(SqliteStore::try_new(&conn).unwrap());
    let war = service.create_war("CSK", "RCB").unwrap();
    let mut thread = service.open_thread(war.id).unwrap().unwrap();

    let err = thread
        .vote_overwrite(service.comments(), Uuid::new_v4(), VoteDirection::Up)
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[test]
fn refresh_picks_up_comments_posted_elsewhere() {
    let conn = open_db_in_memory().unwrap();
    let service = WarService::new(SqliteStore::try_new(&conn).unwrap());
    let war = service.create_war("MI", "CSK").unwrap();
    let mut thread = service.open_thread(war.id).unwrap().unwrap();

    service.comments().create_comment(war.id, "from another client").unwrap();
    service.refresh_thread(&mut thread).unwrap();

    assert_eq!(thread.comments().len(), 1);
    assert_eq!(thread.war().total_comments, 1);
}

#[test]
fn popular_rivalries_can_be_created_directly() {
    let conn = open_db_in_memory().unwrap();
    let service = WarService::new(SqliteStore::try_new(&conn).unwrap());

    for rivalry in popular_rivalries() {
        service.wars().insert(&rivalry).unwrap();
    }
    assert_eq!(service.feed().unwrap().len(), popular_rivalries().len());
}

#[test]
fn unconfigured_service_degrades() {
    let service = WarService::<&dyn Store>::unconfigured();

    assert!(service.feed().unwrap().is_empty());
    assert!(service.trending().unwrap().is_empty());
    assert!(service.open_thread(Uuid::new_v4()).unwrap().is_none());
    assert!(matches!(
        service.create_war("CSK", "RCB").unwrap_err(),
        RepoError::BackendUnavailable
    ));
}
