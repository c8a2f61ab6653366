mod common;

use blogfollow_core::{
    AccountId, BlogId, BlogService, BlogServiceError, FollowRejection, FollowState, Instance,
    SqliteStore,
};
use common::{my_blog, setup, your_blog};

type Service = BlogService<SqliteStore>;

fn rejection(err: BlogServiceError) -> FollowRejection {
    match err {
        BlogServiceError::Follow(err) => err.reason,
        other => panic!("expected a follow rejection, got {other:?}"),
    }
}

#[test]
fn follow_public_blog_is_immediate_and_private_blog_is_a_request() {
    let (mut service, accounts) = setup();
    let blog = service.save(my_blog(&accounts.adri)).unwrap();
    let blog2 = service.save(your_blog(&accounts.adri)).unwrap();

    service.follow(accounts.brais.id, blog.blog_id).unwrap();
    service.follow(accounts.brais.id, blog2.blog_id).unwrap();

    assert!(service.is_follower(accounts.brais.id, blog.blog_id).unwrap());
    assert!(!service.is_follow_request(accounts.brais.id, blog.blog_id).unwrap());
    assert!(!service.is_follower(accounts.brais.id, blog2.blog_id).unwrap());
    assert!(service.is_follow_request(accounts.brais.id, blog2.blog_id).unwrap());

    assert_eq!(service.followers(blog.blog_id).unwrap(), vec![accounts.brais.clone()]);
    assert!(service.follow_requests(blog.blog_id).unwrap().is_empty());
    assert!(service.followers(blog2.blog_id).unwrap().is_empty());
    assert_eq!(
        service.follow_requests(blog2.blog_id).unwrap(),
        vec![accounts.brais.clone()]
    );
    assert_eq!(
        service.following_blogs(accounts.brais.id).unwrap(),
        vec![blog]
    );
}

#[test]
fn follow_rejects_owner_and_repeated_follows() {
    let (mut service, accounts) = setup();
    let blog = service.save(my_blog(&accounts.adri)).unwrap();
    let blog2 = service.save(your_blog(&accounts.adri)).unwrap();

    let err = service.follow(accounts.adri.id, blog.blog_id).unwrap_err();
    assert_eq!(rejection(err), FollowRejection::OwnBlog);

    service.follow(accounts.brais.id, blog.blog_id).unwrap();
    let err = service.follow(accounts.brais.id, blog.blog_id).unwrap_err();
    assert_eq!(rejection(err), FollowRejection::AlreadyFollowing);

    service.follow(accounts.brais.id, blog2.blog_id).unwrap();
    let err = service.follow(accounts.brais.id, blog2.blog_id).unwrap_err();
    assert_eq!(rejection(err), FollowRejection::AlreadyRequested);

    assert_eq!(service.followers(blog.blog_id).unwrap().len(), 1);
    assert_eq!(service.follow_requests(blog2.blog_id).unwrap().len(), 1);
    assert_eq!(
        service.follow_state(accounts.adri.id, blog.blog_id).unwrap(),
        FollowState::None
    );
}

#[test]
fn unfollow_clears_only_active_follows() {
    let (mut service, accounts) = setup();
    let blog = service.save(my_blog(&accounts.adri)).unwrap();
    let blog2 = service.save(your_blog(&accounts.adri)).unwrap();

    service.follow(accounts.brais.id, blog.blog_id).unwrap();
    service.follow(accounts.christian.id, blog.blog_id).unwrap();
    service.unfollow(accounts.brais.id, blog.blog_id).unwrap();

    assert!(!service.is_follower(accounts.brais.id, blog.blog_id).unwrap());
    assert_eq!(
        service.followers(blog.blog_id).unwrap(),
        vec![accounts.christian.clone()]
    );
    assert!(service.following_blogs(accounts.brais.id).unwrap().is_empty());

    let err = service.unfollow(accounts.brais.id, blog.blog_id).unwrap_err();
    assert_eq!(rejection(err), FollowRejection::NotFollowing);

    let err = service.unfollow(accounts.adri.id, blog.blog_id).unwrap_err();
    assert_eq!(rejection(err), FollowRejection::NotFollowing);

    service.follow(accounts.brais.id, blog2.blog_id).unwrap();
    let err = service.unfollow(accounts.brais.id, blog2.blog_id).unwrap_err();
    assert_eq!(rejection(err), FollowRejection::NotFollowing);
    assert!(service.is_follow_request(accounts.brais.id, blog2.blog_id).unwrap());
}

#[test]
fn accept_turns_request_into_follow() {
    let (mut service, accounts) = setup();
    let blog2 = service.save(your_blog(&accounts.adri)).unwrap();

    service.follow(accounts.brais.id, blog2.blog_id).unwrap();
    service
        .accept_follow_request(accounts.brais.id, blog2.blog_id)
        .unwrap();

    assert!(service.is_follower(accounts.brais.id, blog2.blog_id).unwrap());
    assert!(!service.is_follow_request(accounts.brais.id, blog2.blog_id).unwrap());
    assert_eq!(
        service.followers(blog2.blog_id).unwrap(),
        vec![accounts.brais.clone()]
    );
    assert!(service.follow_requests(blog2.blog_id).unwrap().is_empty());
    assert_eq!(
        service.following_blogs(accounts.brais.id).unwrap(),
        vec![blog2]
    );
}

#[test]
fn accept_requires_a_pending_request_from_a_non_owner() {
    let (mut service, accounts) = setup();
    let blog2 = service.save(your_blog(&accounts.adri)).unwrap();

    service.follow(accounts.brais.id, blog2.blog_id).unwrap();
    service
        .accept_follow_request(accounts.brais.id, blog2.blog_id)
        .unwrap();

    let err = service
        .accept_follow_request(accounts.brais.id, blog2.blog_id)
        .unwrap_err();
    assert_eq!(rejection(err), FollowRejection::NoPendingRequest);

    service.unfollow(accounts.brais.id, blog2.blog_id).unwrap();

    let err = service
        .accept_follow_request(accounts.adri.id, blog2.blog_id)
        .unwrap_err();
    assert_eq!(rejection(err), FollowRejection::OwnBlog);

    let err = service
        .accept_follow_request(accounts.brais.id, blog2.blog_id)
        .unwrap_err();
    assert_eq!(rejection(err), FollowRejection::NoPendingRequest);
    assert!(service.followers(blog2.blog_id).unwrap().is_empty());
}

#[test]
fn deny_drops_request_and_allows_a_new_one() {
    let (mut service, accounts) = setup();
    let blog2 = service.save(your_blog(&accounts.adri)).unwrap();

    service.follow(accounts.brais.id, blog2.blog_id).unwrap();
    service
        .deny_follow_request(accounts.brais.id, blog2.blog_id)
        .unwrap();

    assert!(!service.is_follow_request(accounts.brais.id, blog2.blog_id).unwrap());
    assert!(!service.is_follower(accounts.brais.id, blog2.blog_id).unwrap());
    assert!(service.follow_requests(blog2.blog_id).unwrap().is_empty());

    let err = service
        .deny_follow_request(accounts.brais.id, blog2.blog_id)
        .unwrap_err();
    assert_eq!(rejection(err), FollowRejection::NoPendingRequest);

    let err = service
        .deny_follow_request(accounts.adri.id, blog2.blog_id)
        .unwrap_err();
    assert_eq!(rejection(err), FollowRejection::OwnBlog);

    service.follow(accounts.brais.id, blog2.blog_id).unwrap();
    assert!(service.is_follow_request(accounts.brais.id, blog2.blog_id).unwrap());
}

#[test]
fn deny_does_not_touch_active_follows() {
    let (mut service, accounts) = setup();
    let blog = service.save(my_blog(&accounts.adri)).unwrap();

    service.follow(accounts.brais.id, blog.blog_id).unwrap();
    let err = service
        .deny_follow_request(accounts.brais.id, blog.blog_id)
        .unwrap_err();
    assert_eq!(rejection(err), FollowRejection::NoPendingRequest);
    assert!(service.is_follower(accounts.brais.id, blog.blog_id).unwrap());
}

#[test]
fn unknown_identifiers_are_reported_before_transition_rules() {
    let (mut service, accounts) = setup();
    let blog = service.save(my_blog(&accounts.adri)).unwrap();
    let ghost_account = AccountId::generate();
    let ghost_blog = BlogId::generate();

    type Op = fn(&mut Service, AccountId, BlogId) -> Result<(), BlogServiceError>;
    let ops: [(&str, Op); 4] = [
        ("follow", |s: &mut Service, a, b| s.follow(a, b)),
        ("unfollow", |s: &mut Service, a, b| s.unfollow(a, b)),
        ("accept", |s: &mut Service, a, b| s.accept_follow_request(a, b)),
        ("deny", |s: &mut Service, a, b| s.deny_follow_request(a, b)),
    ];

    for (name, op) in ops {
        let err = op(&mut service, ghost_account, blog.blog_id).unwrap_err();
        assert!(
            matches!(err, BlogServiceError::InstanceNotFound(Instance::Account(id)) if id == ghost_account),
            "{name}: unexpected {err:?}"
        );

        let err = op(&mut service, accounts.brais.id, ghost_blog).unwrap_err();
        assert!(
            matches!(err, BlogServiceError::InstanceNotFound(Instance::Blog(id)) if id == ghost_blog),
            "{name}: unexpected {err:?}"
        );

        let err = op(&mut service, ghost_account, ghost_blog).unwrap_err();
        assert!(
            matches!(err, BlogServiceError::InstanceNotFound(Instance::Account(_))),
            "{name}: unexpected {err:?}"
        );

        let err = op(&mut service, accounts.adri.id, ghost_blog).unwrap_err();
        assert!(
            matches!(err, BlogServiceError::InstanceNotFound(Instance::Blog(_))),
            "{name}: unexpected {err:?}"
        );
    }

    assert!(service.followers(blog.blog_id).unwrap().is_empty());
}
