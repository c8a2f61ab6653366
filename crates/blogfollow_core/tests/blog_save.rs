mod common;

use blogfollow_core::{AccountId, BlogDraft, BlogServiceError, BlogValidationError, Instance};
use common::{my_blog, setup, your_blog};

#[test]
fn save_assigns_identity_and_is_found_by_name() {
    let (mut service, accounts) = setup();

    let blog = service.save(my_blog(&accounts.adri)).unwrap();
    let found = service.find_blog_by_name("MyBlog").unwrap().unwrap();

    assert_eq!(found, blog);
    assert_eq!(found.title, "AdriBlog");
    assert_eq!(found.owner, accounts.adri.id);
    assert!(!found.is_private);
    assert_eq!(service.find_blog(blog.blog_id).unwrap(), Some(blog));
}

#[test]
fn save_with_existing_name_is_not_available() {
    let (mut service, accounts) = setup();
    service.save(my_blog(&accounts.adri)).unwrap();

    let duplicate = BlogDraft::new(
        "MyBlog",
        "BraisBlog",
        "This is the blog of Brais",
        true,
        accounts.brais.id,
    );
    let err = service.save(duplicate).unwrap_err();
    assert!(matches!(err, BlogServiceError::SaveNotAvailable { ref name } if name == "MyBlog"));
    assert_eq!(service.find_blogs("MyBlog").unwrap().len(), 1);
}

#[test]
fn names_are_case_sensitive() {
    let (mut service, accounts) = setup();
    service.save(my_blog(&accounts.adri)).unwrap();

    let mut lower = my_blog(&accounts.brais);
    lower.name = "myblog".to_string();
    let saved = service.save(lower).unwrap();

    assert_eq!(service.find_blog_by_name("myblog").unwrap(), Some(saved));
    assert!(service.find_blog_by_name("MYBLOG").unwrap().is_none());
}

#[test]
fn save_rejects_blank_attributes_and_unknown_owner() {
    let (mut service, accounts) = setup();

    let mut blank = my_blog(&accounts.adri);
    blank.name = "  ".to_string();
    let err = service.save(blank).unwrap_err();
    assert!(matches!(
        err,
        BlogServiceError::Validation(BlogValidationError::BlankName)
    ));

    let mut orphan = my_blog(&accounts.adri);
    orphan.owner = AccountId::generate();
    let err = service.save(orphan).unwrap_err();
    assert!(matches!(
        err,
        BlogServiceError::InstanceNotFound(Instance::Account(_))
    ));
    assert!(service.find_blogs("").unwrap().is_empty());
}

#[test]
fn update_persists_name_and_title_changes() {
    let (mut service, accounts) = setup();
    let mut blog = service.save(my_blog(&accounts.adri)).unwrap();

    blog.name = "YourBlog".to_string();
    blog.title = "BraisBlog".to_string();
    let updated = service.update(&blog).unwrap();
    let found = service.find_blog_by_name("YourBlog").unwrap().unwrap();
    assert_eq!(found, updated);
    assert_eq!(found.title, "BraisBlog");
    assert!(service.find_blog_by_name("MyBlog").unwrap().is_none());

    blog.title = "ChristianBlog".to_string();
    let updated = service.update(&blog).unwrap();
    let found = service.find_blog_by_name("YourBlog").unwrap().unwrap();
    assert_eq!(found, updated);
    assert_eq!(found.title, "ChristianBlog");
}

#[test]
fn update_keeps_owner_and_privacy() {
    let (mut service, accounts) = setup();
    let mut blog = service.save(my_blog(&accounts.adri)).unwrap();

    blog.owner = accounts.brais.id;
    blog.is_private = true;
    blog.description = "Edited".to_string();
    let updated = service.update(&blog).unwrap();

    assert_eq!(updated.owner, accounts.adri.id);
    assert!(!updated.is_private);
    assert_eq!(updated.description, "Edited");
    let stored = service.find_blog(blog.blog_id).unwrap().unwrap();
    assert_eq!(stored.owner, accounts.adri.id);
    assert!(!stored.is_private);
}

#[test]
fn update_to_a_name_held_by_another_blog_is_not_available() {
    let (mut service, accounts) = setup();
    service.save(my_blog(&accounts.adri)).unwrap();
    let mut other = service.save(your_blog(&accounts.adri)).unwrap();

    other.name = "MyBlog".to_string();
    let err = service.update(&other).unwrap_err();
    assert!(matches!(err, BlogServiceError::SaveNotAvailable { .. }));

    let stored = service.find_blog(other.blog_id).unwrap().unwrap();
    assert_eq!(stored.name, "YourBlog");
}

#[test]
fn update_of_unknown_blog_is_not_found() {
    let (mut service, accounts) = setup();
    let ghost = my_blog(&accounts.adri).into_blog(blogfollow_core::BlogId::generate());

    let err = service.update(&ghost).unwrap_err();
    assert!(matches!(
        err,
        BlogServiceError::InstanceNotFound(Instance::Blog(id)) if id == ghost.blog_id
    ));
}

#[test]
fn find_blog_by_name_returns_none_without_match() {
    let (service, _accounts) = setup();
    assert!(service.find_blog_by_name("MyBlog").unwrap().is_none());
}

#[test]
fn find_blogs_matches_substrings_in_creation_order() {
    let (mut service, accounts) = setup();
    let blog = service.save(my_blog(&accounts.adri)).unwrap();
    let blog2 = service.save(your_blog(&accounts.adri)).unwrap();

    assert!(service.find_blogs("zzz").unwrap().is_empty());
    assert_eq!(service.find_blogs("My").unwrap(), vec![blog.clone()]);
    assert_eq!(service.find_blogs("Blog").unwrap(), vec![blog, blog2]);
    assert!(service.find_blogs("blog").unwrap().is_empty());
}

#[test]
fn find_blogs_treats_pattern_characters_literally() {
    let (mut service, accounts) = setup();
    let mut percent = my_blog(&accounts.adri);
    percent.name = "100%Rust".to_string();
    let percent = service.save(percent).unwrap();
    let mut underscore = your_blog(&accounts.adri);
    underscore.name = "snake_case".to_string();
    let underscore = service.save(underscore).unwrap();

    assert_eq!(service.find_blogs("%").unwrap(), vec![percent]);
    assert_eq!(service.find_blogs("_").unwrap(), vec![underscore]);
}
