//! Access evaluation and access mutations through the client.

use tabletop_client::{
    AccessStateEvent, OwnedTokenAddedEvent, OwnedTokenRemovedEvent, TabletopClientError,
};
use tabletop_shared::{
    Access, AccessDelta, AccessError, AccessTarget, ClientMessage, LocalId, SyncTo, DEFAULT_ACCESS,
};
use tabletop_test::{assert_nothing_sent, assert_sent, ShapeStateBuilder, TestContext};

const FULL_RIGHTS: &str = "userWithFullRights";
const NO_RIGHTS: &str = "userWithNoRights";

/// Two shapes: `a` grants edit+vision by default, `b` grants movement by
/// default and carries one full and one empty override.
fn fixture(username: &str) -> (TestContext, LocalId, LocalId) {
    let mut ctx = TestContext::new(username);
    let a = ctx.spawn(
        ShapeStateBuilder::new("a")
            .default_access(Access::new(true, false, true))
            .build(),
    );
    let b = ctx.spawn(
        ShapeStateBuilder::new("b")
            .default_access(Access::new(false, true, false))
            .owner(FULL_RIGHTS, Access::full())
            .owner(NO_RIGHTS, DEFAULT_ACCESS)
            .build(),
    );
    (ctx, a, b)
}

// hasAccessTo

#[test]
fn dm_is_granted_everything() {
    let (mut ctx, a, b) = fixture(NO_RIGHTS);
    ctx.client.session_mut().set_dm(true);

    assert!(ctx.has_access(&a, false, AccessDelta::edit()));
    assert!(ctx.has_access(&b, false, AccessDelta::edit()));

    // missing shape
    ctx.shapes.remove(&a);
    assert!(ctx.has_access(&a, false, AccessDelta::edit()));

    // inactive token behind the limiter
    ctx.shapes.set_token(&b, true);
    ctx.client.session_mut().set_active_tokens([]);
    assert!(ctx.has_access(&b, true, AccessDelta::edit()));

    // a shape nobody ever heard of
    assert!(ctx.has_access(&LocalId::new(999), true, AccessDelta::vision()));
}

#[test]
fn missing_shape_is_denied() {
    let (mut ctx, a, b) = fixture(FULL_RIGHTS);
    ctx.shapes.remove(&a);
    ctx.shapes.remove(&b);

    assert!(!ctx.has_access(&a, false, AccessDelta::edit()));
    assert!(!ctx.has_access(&b, false, AccessDelta::edit()));

    ctx.client.session_mut().set_fake_player(true);
    assert!(!ctx.has_access(&a, false, AccessDelta::movement()));
}

#[test]
fn limiter_denies_inactive_tokens() {
    let (mut ctx, a, b) = fixture(FULL_RIGHTS);
    ctx.shapes.set_token(&a, true);
    ctx.client.session_mut().set_active_tokens([]);

    assert!(!ctx.has_access(&a, true, AccessDelta::edit()));
    // without the limiter
    assert!(ctx.has_access(&a, false, AccessDelta::edit()));
    // not a token
    assert!(ctx.has_access(&b, true, AccessDelta::edit()));
    // active
    ctx.client.session_mut().set_active_tokens([a]);
    assert!(ctx.has_access(&a, true, AccessDelta::edit()));

    // fake player does not get past the limiter
    ctx.client.session_mut().set_active_tokens([]);
    ctx.client.session_mut().set_fake_player(true);
    assert!(!ctx.has_access(&a, true, AccessDelta::edit()));

    // nor does a user override
    ctx.client.session_mut().set_fake_player(false);
    ctx.shapes.set_token(&b, true);
    assert!(!ctx.has_access(&b, true, AccessDelta::edit()));
}

#[test]
fn owned_tokens_are_active_by_default() {
    let mut ctx = TestContext::new("bob");
    let token = ctx.spawn(
        ShapeStateBuilder::new("t")
            .token()
            .owner("bob", Access::new(false, true, true))
            .build(),
    );
    let other = ctx.spawn_token("u");

    assert!(ctx.client.session().owns_token(&token));
    assert!(ctx.has_access(&token, true, AccessDelta::movement()));
    assert!(!ctx.has_access(&other, true, AccessDelta::vision()));
}

#[test]
fn fake_player_is_granted_without_overrides() {
    let (mut ctx, a, b) = fixture(NO_RIGHTS);
    ctx.client.session_mut().set_dm(true);
    ctx.client.session_mut().set_fake_player(true);

    assert!(ctx.has_access(&a, false, AccessDelta::movement()));
    assert!(ctx.has_access(&b, false, AccessDelta::edit()));
}

#[test]
fn default_grant_beats_denying_override() {
    let (ctx, a, b) = fixture(NO_RIGHTS);

    assert!(ctx.has_access(&a, false, AccessDelta::edit()));
    assert!(ctx.has_access(&a, false, AccessDelta::vision()));
    assert!(ctx.has_access(&b, false, AccessDelta::movement()));
}

#[test]
fn override_grant_beats_denying_default() {
    let (ctx, _, b) = fixture(FULL_RIGHTS);

    assert!(ctx.has_access(&b, false, AccessDelta::edit()));
    assert!(ctx.has_access(&b, false, AccessDelta::vision()));
}

#[test]
fn denying_override_and_default_deny() {
    let (ctx, a, b) = fixture(NO_RIGHTS);

    assert!(!ctx.has_access(&a, false, AccessDelta::movement()));
    assert!(!ctx.has_access(&b, false, AccessDelta::edit()));
    assert!(!ctx.has_access(&b, false, AccessDelta::vision()));
}

#[test]
fn requested_fields_must_all_come_from_one_rule() {
    let (ctx, a, _) = fixture(NO_RIGHTS);

    assert!(ctx.has_access(&a, false, AccessDelta::edit().with_vision(true)));
    assert!(!ctx.has_access(&a, false, AccessDelta::edit().with_movement(true)));
}

#[test]
fn default_only_shape_scenario() {
    let mut ctx = TestContext::new("bob");
    let a = ctx.spawn(
        ShapeStateBuilder::new("A")
            .default_access(Access::new(false, true, true))
            .build(),
    );

    assert!(!ctx.has_access(&a, false, AccessDelta::edit()));
    assert!(ctx.has_access(&a, false, AccessDelta::movement()));
}

// Reads

#[test]
fn reads_on_unknown_shapes_are_empty() {
    let ctx = TestContext::new("bob");
    let unknown = LocalId::new(42);

    assert_eq!(ctx.client.access().get_default(&unknown), None);
    assert_eq!(ctx.client.access().get_access(&unknown, "bob"), None);
    assert!(ctx.client.access().get_owners(&unknown).is_empty());
    assert!(ctx.client.access().get_owners_full(&unknown).is_empty());
}

#[test]
fn owners_keep_insertion_order() {
    let (mut ctx, _, b) = fixture("bob");
    ctx.client
        .add_access(&mut ctx.shapes, b, "other", DEFAULT_ACCESS, SyncTo::Ui)
        .unwrap();

    assert_eq!(
        ctx.client.access().get_owners(&b),
        vec![FULL_RIGHTS.to_string(), NO_RIGHTS.to_string(), "other".to_string()]
    );
    let full = ctx.client.access().get_owners_full(&b);
    assert_eq!(full.len(), 3);
    assert!(full.iter().all(|owner| owner.shape == b));
    assert_eq!(full[0].access, Access::full());
    assert_eq!(full[2].access, DEFAULT_ACCESS);
}

// addAccess

#[test]
fn add_existing_owner_is_a_noop() {
    let mut ctx = TestContext::new("bob");
    let a = ctx.spawn(ShapeStateBuilder::new("A").token().build());

    ctx.client
        .add_access(&mut ctx.shapes, a, "bob", Access::new(false, false, true), SyncTo::Server)
        .unwrap();
    assert!(ctx.client.session().owns_token(&a));
    assert_sent!(ctx, ["Shape.Owner.Add"]);

    let result = ctx.client.add_access(
        &mut ctx.shapes,
        a,
        "bob",
        Access::full(),
        SyncTo::Server,
    );
    assert_eq!(
        result,
        Err(TabletopClientError::Access(AccessError::OwnerAlreadyExists {
            shape: a,
            user: "bob".to_string(),
        }))
    );
    assert_nothing_sent!(ctx);
    assert_eq!(
        ctx.client.access().get_access(&a, "bob"),
        Some(Access::new(false, false, true))
    );
}

#[test]
fn add_new_owner_leaves_others_untouched() {
    let (mut ctx, _, b) = fixture("bob");

    ctx.client
        .add_access(
            &mut ctx.shapes,
            b,
            "new user",
            Access::new(false, true, true),
            SyncTo::Server,
        )
        .unwrap();

    assert_eq!(
        ctx.client.access().get_access(&b, "new user"),
        Some(Access::new(false, true, true))
    );
    assert_eq!(ctx.client.access().get_access(&b, FULL_RIGHTS), Some(Access::full()));
    assert_eq!(
        ctx.client.access().get_default(&b),
        Some(Access::new(false, true, false))
    );

    let sent = ctx.take_sent();
    assert_eq!(sent.len(), 1);
    let ClientMessage::OwnerAdd(owner) = &sent[0] else {
        panic!("expected Shape.Owner.Add, got {:?}", sent[0]);
    };
    assert_eq!(owner.shape.as_str(), "b");
    assert_eq!(owner.user, "new user");
    assert!(owner.access.movement_access);
}

#[test]
fn add_on_unknown_shape_is_an_error() {
    let mut ctx = TestContext::new("bob");
    let result = ctx.client.add_access(
        &mut ctx.shapes,
        LocalId::new(3),
        "bob",
        Access::full(),
        SyncTo::Server,
    );
    assert!(matches!(
        result,
        Err(TabletopClientError::Access(AccessError::UnknownShape { .. }))
    ));
    assert_nothing_sent!(ctx);
}

#[test]
fn non_server_sync_does_not_emit() {
    let mut ctx = TestContext::new("bob");
    let a = ctx.spawn_shape("A");

    ctx.client
        .add_access(&mut ctx.shapes, a, "some user", Access::full(), SyncTo::Ui)
        .unwrap();
    ctx.client
        .add_access(&mut ctx.shapes, a, "new user", Access::full(), SyncTo::Shape)
        .unwrap();
    assert_nothing_sent!(ctx);
    assert_eq!(ctx.client.access().get_owners(&a).len(), 2);
}

#[test]
fn add_vision_registers_owned_token_for_session_user_only() {
    let mut ctx = TestContext::new("bob");
    let shape = ctx.spawn_shape("plain");
    let token = ctx.spawn_token("token");

    // no vision
    ctx.client
        .add_access(&mut ctx.shapes, token, "bob", Access::new(true, true, false), SyncTo::Ui)
        .unwrap();
    // not a token
    ctx.client
        .add_access(&mut ctx.shapes, shape, "bob", Access::full(), SyncTo::Ui)
        .unwrap();
    // other user
    ctx.client
        .add_access(&mut ctx.shapes, token, "alice", Access::full(), SyncTo::Ui)
        .unwrap();
    assert!(ctx.client.session().owned_tokens().is_empty());

    let other_token = ctx.spawn_token("token2");
    ctx.client
        .add_access(
            &mut ctx.shapes,
            other_token,
            "bob",
            Access::new(false, false, true),
            SyncTo::Ui,
        )
        .unwrap();
    assert!(ctx.client.session().owns_token(&other_token));

    let added: Vec<LocalId> = ctx.client.events().read::<OwnedTokenAddedEvent>().collect();
    assert_eq!(added, vec![other_token]);
}

// updateAccess

#[test]
fn update_errors_leave_state_alone() {
    let mut ctx = TestContext::new("bob");
    let a = ctx.spawn_shape("A");

    let unknown = ctx.client.update_access(
        &mut ctx.shapes,
        LocalId::new(77),
        AccessTarget::user("bob"),
        AccessDelta::edit(),
        SyncTo::Server,
    );
    assert!(matches!(
        unknown,
        Err(TabletopClientError::Access(AccessError::UnknownShape { .. }))
    ));

    let missing = ctx.client.update_access(
        &mut ctx.shapes,
        a,
        AccessTarget::user("bob"),
        AccessDelta::edit(),
        SyncTo::Server,
    );
    assert!(matches!(
        missing,
        Err(TabletopClientError::Access(AccessError::OwnerNotFound { .. }))
    ));
    assert_nothing_sent!(ctx);
}

#[test]
fn update_default_access() {
    let mut ctx = TestContext::new("bob");
    let a = ctx.spawn_shape("A");

    ctx.client
        .update_access(
            &mut ctx.shapes,
            a,
            AccessTarget::Default,
            AccessDelta::edit(),
            SyncTo::Server,
        )
        .unwrap();

    assert_eq!(
        ctx.client.access().get_default(&a),
        Some(Access::new(true, false, false))
    );
    let sent = ctx.take_sent();
    let [ClientMessage::DefaultAccessUpdate(update)] = sent.as_slice() else {
        panic!("expected one Shape.Owner.Default.Update, got {:?}", sent);
    };
    assert_eq!(update.edit_access, Some(true));
    assert_eq!(update.movement_access, None);
}

#[test]
fn update_user_access_sends_only_delta() {
    let mut ctx = TestContext::new("bob");
    let a = ctx.spawn(ShapeStateBuilder::new("A").owner("some user", DEFAULT_ACCESS).build());

    ctx.client
        .update_access(
            &mut ctx.shapes,
            a,
            AccessTarget::user("some user"),
            AccessDelta::edit(),
            SyncTo::Server,
        )
        .unwrap();

    assert_eq!(
        ctx.client.access().get_access(&a, "some user"),
        Some(Access::new(true, false, false))
    );
    let frames = ctx.client.take_outgoing_frames().unwrap();
    assert_eq!(
        frames,
        vec![
            r#"{"event":"Shape.Owner.Update","data":{"shape":"A","user":"some user","edit_access":true}}"#
                .to_string()
        ]
    );
}

#[test]
fn vision_toggle_tracks_owned_tokens() {
    let mut ctx = TestContext::new("some user");
    let a = ctx.spawn(
        ShapeStateBuilder::new("A")
            .token()
            .owner("some user", DEFAULT_ACCESS)
            .owner("other user", DEFAULT_ACCESS)
            .build(),
    );

    // another user's override never touches the set
    ctx.client
        .update_access(
            &mut ctx.shapes,
            a,
            AccessTarget::user("other user"),
            AccessDelta::vision(),
            SyncTo::Server,
        )
        .unwrap();
    assert!(!ctx.client.session().owns_token(&a));

    ctx.client
        .update_access(
            &mut ctx.shapes,
            a,
            AccessTarget::user("some user"),
            AccessDelta::vision(),
            SyncTo::Server,
        )
        .unwrap();
    assert!(ctx.client.session().owns_token(&a));

    ctx.client
        .update_access(
            &mut ctx.shapes,
            a,
            AccessTarget::user("some user"),
            AccessDelta::new().with_vision(false),
            SyncTo::Server,
        )
        .unwrap();
    assert!(!ctx.client.session().owns_token(&a));

    let mut events = ctx.client.take_events();
    assert_eq!(events.read::<OwnedTokenAddedEvent>().count(), 1);
    assert_eq!(events.read::<OwnedTokenRemovedEvent>().count(), 1);
}

#[test]
fn vision_toggle_on_non_token_is_ignored() {
    let mut ctx = TestContext::new("some user");
    let a = ctx.spawn(ShapeStateBuilder::new("A").owner("some user", DEFAULT_ACCESS).build());

    ctx.client
        .update_access(
            &mut ctx.shapes,
            a,
            AccessTarget::user("some user"),
            AccessDelta::vision(),
            SyncTo::Ui,
        )
        .unwrap();
    assert!(!ctx.client.session().owns_token(&a));
}

#[test]
fn vision_toggle_without_live_shape_is_permissive() {
    let mut ctx = TestContext::new("some user");
    let a = ctx.spawn(
        ShapeStateBuilder::new("A")
            .token()
            .owner("some user", DEFAULT_ACCESS)
            .build(),
    );
    ctx.shapes.remove(&a);

    ctx.client
        .update_access(
            &mut ctx.shapes,
            a,
            AccessTarget::user("some user"),
            AccessDelta::vision(),
            SyncTo::Ui,
        )
        .unwrap();
    assert_eq!(
        ctx.client.access().get_access(&a, "some user"),
        Some(Access::new(false, false, true))
    );
    assert!(!ctx.client.session().owns_token(&a));
}

// removeAccess

#[test]
fn remove_access() {
    let mut ctx = TestContext::new("bob");
    let a = ctx.spawn(ShapeStateBuilder::new("A").owner("some user", DEFAULT_ACCESS).build());

    ctx.client
        .remove_access(&mut ctx.shapes, a, "some user", SyncTo::Server)
        .unwrap();
    assert_eq!(ctx.client.access().get_access(&a, "some user"), None);
    assert_sent!(ctx, ["Shape.Owner.Delete"]);

    let again = ctx
        .client
        .remove_access(&mut ctx.shapes, a, "some user", SyncTo::Server);
    assert!(matches!(
        again,
        Err(TabletopClientError::Access(AccessError::OwnerNotFound { .. }))
    ));
    assert_nothing_sent!(ctx);
}

#[test]
fn remove_vision_owner_releases_token() {
    let mut ctx = TestContext::new("bob");
    let a = ctx.spawn(
        ShapeStateBuilder::new("A")
            .token()
            .owner("bob", Access::new(false, false, true))
            .build(),
    );
    assert!(ctx.client.session().owns_token(&a));

    ctx.client
        .remove_access(&mut ctx.shapes, a, "bob", SyncTo::Server)
        .unwrap();
    assert!(!ctx.client.session().owns_token(&a));
}

// Projection

#[test]
fn projection_follows_mutations_of_focused_shape() {
    let mut ctx = TestContext::new("bob");
    let a = ctx.spawn(
        ShapeStateBuilder::new("A")
            .owner("some user", Access::new(false, false, true))
            .build(),
    );
    let b = ctx.spawn_shape("B");
    ctx.focus(a);
    ctx.client.take_events();

    assert_eq!(
        ctx.client.access().state().player("some user"),
        Some(&Access::new(false, false, true))
    );

    ctx.client
        .update_access(
            &mut ctx.shapes,
            a,
            AccessTarget::user("some user"),
            AccessDelta::edit(),
            SyncTo::Server,
        )
        .unwrap();
    assert_eq!(
        ctx.client.access().state().player("some user"),
        Some(&Access::new(true, false, true))
    );

    // another shape does not touch the projection
    ctx.client
        .add_access(&mut ctx.shapes, b, "new user", Access::full(), SyncTo::Ui)
        .unwrap();
    assert!(ctx.client.access().state().player("new user").is_none());

    ctx.client
        .remove_access(&mut ctx.shapes, a, "some user", SyncTo::Ui)
        .unwrap();
    assert!(ctx.client.access().state().player("some user").is_none());

    assert_eq!(ctx.client.events().read::<AccessStateEvent>().count(), 2);

    ctx.client.drop_state();
    assert_eq!(ctx.client.access().state().id, None);
}

#[test]
fn despawned_parent_leaves_the_projection() {
    let mut ctx = TestContext::new("bob");
    let parent = ctx.spawn(
        ShapeStateBuilder::new("parent")
            .owner("alice", Access::full())
            .build(),
    );
    let child = ctx.spawn_child("child", parent);
    ctx.focus(child);
    assert_eq!(ctx.client.access().state().parent_id, Some(parent));
    assert!(ctx.client.access().state().parent_player("alice").is_some());
    ctx.client.take_events();

    ctx.despawn(&parent);
    let state = ctx.client.access().state();
    assert_eq!(state.id, Some(child));
    assert_eq!(state.parent_id, None);
    assert_eq!(state.parent_default_access, None);
    assert!(state.parent_player_access.is_empty());
    assert_eq!(ctx.client.events().read::<AccessStateEvent>().count(), 1);

    // the recycled handle now names an unrelated shape
    let stranger = ctx.spawn(
        ShapeStateBuilder::new("stranger")
            .owner("mallory", Access::full())
            .build(),
    );
    assert_eq!(stranger, parent);

    let state = ctx.client.access().state();
    assert_eq!(state.parent_id, None);
    assert!(state.parent_player("mallory").is_none());
}

// Lifecycle

#[test]
fn clear_releases_owned_tokens() {
    let mut ctx = TestContext::new("bob");
    let token = ctx.spawn(
        ShapeStateBuilder::new("t")
            .token()
            .owner("bob", Access::full())
            .build(),
    );
    let other = ctx.spawn_token("u");
    assert!(ctx.client.session().owns_token(&token));
    ctx.client.take_events();

    ctx.client.clear();

    assert!(ctx.client.session().owned_tokens().is_empty());
    let removed: Vec<LocalId> = ctx.client.events().read::<OwnedTokenRemovedEvent>().collect();
    assert_eq!(removed, vec![token]);
    assert!(!ctx.client.access().is_known(&token));
    assert!(!ctx.client.access().is_known(&other));
    assert!(ctx.client.ids().is_empty());
}
