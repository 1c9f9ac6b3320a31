use vibelink_shared::models::{AuthTokens, Settings};
use vibelink_store::Database;

#[test]
fn tokens_and_settings_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut db = Database::open_in(dir.path()).unwrap();
        db.save_tokens(&AuthTokens {
            access: "acc".into(),
            refresh: "ref".into(),
        })
        .unwrap();
        let mut settings = Settings::default();
        settings.matchmaking.location_radius = 120;
        db.save_settings_snapshot(&settings).unwrap();
    }

    let db = Database::open_in(dir.path()).unwrap();
    let tokens = db.load_tokens().unwrap().expect("tokens persisted");
    assert_eq!(tokens.access, "acc");
    assert_eq!(tokens.refresh, "ref");

    let snap = db.load_settings_snapshot().unwrap().expect("snapshot persisted");
    assert_eq!(snap.settings.matchmaking.location_radius, 120);
}
