//! Shared scenario fixture.
//!
//! Every call to `setup` opens a fresh in-memory database seeded with three
//! accounts; dropping the returned service discards all state.

#![allow(dead_code)]

use blogfollow_core::db::open_db_in_memory;
use blogfollow_core::{
    Account, AccountService, BlogDraft, BlogService, NewAccount, Role, SqliteStore,
};

pub struct Accounts {
    pub adri: Account,
    pub brais: Account,
    pub christian: Account,
}

pub fn setup() -> (BlogService<SqliteStore>, Accounts) {
    let mut store = SqliteStore::try_new(open_db_in_memory().unwrap()).unwrap();
    let accounts = seed_accounts(&mut store);
    (BlogService::new(store), accounts)
}

pub fn seed_accounts(store: &mut SqliteStore) -> Accounts {
    let mut service = AccountService::new(store);
    Accounts {
        adri: service
            .save(NewAccount::new("adri@udc.es", "adri", Role::User, "adri"))
            .unwrap(),
        brais: service
            .save(NewAccount::new("brais@udc.es", "brais", Role::User, "brais"))
            .unwrap(),
        christian: service
            .save(NewAccount::new(
                "christian@udc.es",
                "christian",
                Role::User,
                "christian",
            ))
            .unwrap(),
    }
}

/// Public blog named `MyBlog`.
pub fn my_blog(owner: &Account) -> BlogDraft {
    BlogDraft::new(
        "MyBlog",
        "AdriBlog",
        "This is the blog of Adri",
        false,
        owner.id,
    )
}

/// Private blog named `YourBlog`.
pub fn your_blog(owner: &Account) -> BlogDraft {
    BlogDraft::new(
        "YourBlog",
        "AdriBlog2",
        "This is the second blog of Adri",
        true,
        owner.id,
    )
}
