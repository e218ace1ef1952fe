use blogr::domain::category::NewCategory;
use blogr::domain::comment::NewComment;
use blogr::domain::location::NewLocation;
use blogr::domain::post::NewPost;
use blogr::domain::types::PostId;
use blogr::domain::user::NewUser;
use blogr::repository::{
    CategoryReader, CategoryWriter, CommentReader, CommentWriter, DieselRepository,
    LocationReader, LocationWriter, PostListQuery, PostReader, PostWriter, UserReader,
    UserWriter,
};
use chrono::{Duration, NaiveDateTime, Utc};

mod common;

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

fn seed_user(repo: &DieselRepository, username: &str) -> blogr::domain::user::User {
    use blogr::domain::types::{EmailAddress, Username};
    repo.create_user(&NewUser {
        username: Username::new(username).expect("valid username"),
        first_name: String::new(),
        last_name: String::new(),
        email: EmailAddress::new(format!("{username}@example.com")).expect("valid email"),
        password_hash: "hash".to_string(),
        created_at: now(),
    })
    .expect("should create user")
}

fn seed_category(
    repo: &DieselRepository,
    slug: &str,
    is_published: bool,
) -> blogr::domain::category::Category {
    use blogr::domain::types::{CategoryDescription, CategorySlug, CategoryTitle};
    let slug = CategorySlug::new(slug).expect("valid slug");
    repo.create_category(&NewCategory {
        title: CategoryTitle::new(format!("Category {slug}")).expect("valid title"),
        description: CategoryDescription::new("About things").expect("valid description"),
        slug: slug.clone(),
        is_published,
        created_at: now(),
    })
    .expect("should create category");
    repo.get_category_by_slug(&slug)
        .expect("should read category")
        .expect("inserted category should exist")
}

fn seed_location(repo: &DieselRepository, name: &str) -> blogr::domain::location::Location {
    use blogr::domain::types::LocationName;
    repo.create_location(&NewLocation {
        name: LocationName::new(name).expect("valid name"),
        is_published: true,
        created_at: now(),
    })
    .expect("should create location");
    repo.list_locations()
        .expect("should list locations")
        .into_iter()
        .find(|l| l.name.as_str() == name)
        .expect("inserted location should exist")
}

struct PostSeed {
    author_id: blogr::domain::types::UserId,
    category_id: Option<blogr::domain::types::CategoryId>,
    pub_date: NaiveDateTime,
    is_published: bool,
}

fn seed_post(repo: &DieselRepository, seed: PostSeed) -> blogr::domain::post::Post {
    use blogr::domain::types::{PostBody, PostTitle};
    repo.create_post(&NewPost {
        author_id: seed.author_id,
        category_id: seed.category_id,
        location_id: None,
        title: PostTitle::new("A post").expect("valid title"),
        body: PostBody::new("Body").expect("valid body"),
        pub_date: seed.pub_date,
        image: None,
        is_published: seed.is_published,
        created_at: now(),
    })
    .expect("should create post")
}

fn seed_comment(
    repo: &DieselRepository,
    post_id: blogr::domain::types::PostId,
    author_id: blogr::domain::types::UserId,
    body: &str,
) {
    use blogr::domain::types::CommentBody;
    repo.create_comment(&NewComment {
        post_id,
        author_id,
        body: CommentBody::new(body).expect("valid body"),
        created_at: now(),
    })
    .expect("should create comment");
}

#[test]
fn public_listing_applies_the_publish_gate() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let author = seed_user(&repo, "alice");
    let visible_cat = seed_category(&repo, "travel", true);
    let hidden_cat = seed_category(&repo, "drafts", false);

    let visible = seed_post(
        &repo,
        PostSeed {
            author_id: author.id,
            category_id: Some(visible_cat.id),
            pub_date: now() - Duration::hours(1),
            is_published: true,
        },
    );
    // Scheduled for the future.
    seed_post(
        &repo,
        PostSeed {
            author_id: author.id,
            category_id: Some(visible_cat.id),
            pub_date: now() + Duration::hours(1),
            is_published: true,
        },
    );
    // Draft.
    seed_post(
        &repo,
        PostSeed {
            author_id: author.id,
            category_id: Some(visible_cat.id),
            pub_date: now() - Duration::hours(1),
            is_published: false,
        },
    );
    // Category itself unpublished.
    seed_post(
        &repo,
        PostSeed {
            author_id: author.id,
            category_id: Some(hidden_cat.id),
            pub_date: now() - Duration::hours(1),
            is_published: true,
        },
    );
    // No category at all.
    seed_post(
        &repo,
        PostSeed {
            author_id: author.id,
            category_id: None,
            pub_date: now() - Duration::hours(1),
            is_published: true,
        },
    );

    let (total, previews) = repo
        .list_posts(PostListQuery::public())
        .expect("should list posts");
    assert_eq!(total, 1);
    assert_eq!(previews.len(), 1);
    assert_eq!(previews[0].post.id, visible.id);
}

#[test]
fn listing_carries_comment_counts() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let author = seed_user(&repo, "alice");
    let category = seed_category(&repo, "travel", true);
    let first = seed_post(
        &repo,
        PostSeed {
            author_id: author.id,
            category_id: Some(category.id),
            pub_date: now() - Duration::hours(2),
            is_published: true,
        },
    );
    let second = seed_post(
        &repo,
        PostSeed {
            author_id: author.id,
            category_id: Some(category.id),
            pub_date: now() - Duration::hours(1),
            is_published: true,
        },
    );

    seed_comment(&repo, first.id, author.id, "one");
    seed_comment(&repo, first.id, author.id, "two");

    let (_, previews) = repo
        .list_posts(PostListQuery::public())
        .expect("should list posts");

    let count_of = |id: PostId| {
        previews
            .iter()
            .find(|p| p.post.id == id)
            .expect("post should be listed")
            .comment_count
    };
    assert_eq!(count_of(first.id), 2);
    assert_eq!(count_of(second.id), 0);
}

#[test]
fn listing_is_newest_first_and_paginated() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let author = seed_user(&repo, "alice");
    let category = seed_category(&repo, "travel", true);
    for i in 1..=12 {
        seed_post(
            &repo,
            PostSeed {
                author_id: author.id,
                category_id: Some(category.id),
                pub_date: now() - Duration::minutes(i),
                is_published: true,
            },
        );
    }

    let (total, first_page) = repo
        .list_posts(PostListQuery::public().paginate(1, 10))
        .expect("should list posts");
    assert_eq!(total, 12);
    assert_eq!(first_page.len(), 10);

    let dates: Vec<NaiveDateTime> = first_page.iter().map(|p| p.post.pub_date).collect();
    let mut sorted = dates.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(dates, sorted);

    let (_, second_page) = repo
        .list_posts(PostListQuery::public().paginate(2, 10))
        .expect("should list posts");
    assert_eq!(second_page.len(), 2);
}

#[test]
fn author_scope_includes_drafts_public_scope_does_not() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let author = seed_user(&repo, "alice");
    let category = seed_category(&repo, "travel", true);
    seed_post(
        &repo,
        PostSeed {
            author_id: author.id,
            category_id: Some(category.id),
            pub_date: now() - Duration::hours(1),
            is_published: true,
        },
    );
    seed_post(
        &repo,
        PostSeed {
            author_id: author.id,
            category_id: Some(category.id),
            pub_date: now() + Duration::hours(1),
            is_published: true,
        },
    );
    seed_post(
        &repo,
        PostSeed {
            author_id: author.id,
            category_id: Some(category.id),
            pub_date: now() - Duration::hours(1),
            is_published: false,
        },
    );

    let (own_total, _) = repo
        .list_posts(PostListQuery::by_author(author.id))
        .expect("should list posts");
    assert_eq!(own_total, 3);

    let (public_total, _) = repo
        .list_posts(PostListQuery::published_by_author(author.id))
        .expect("should list posts");
    assert_eq!(public_total, 1);
}

#[test]
fn deleting_a_category_detaches_its_posts() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let author = seed_user(&repo, "alice");
    let category = seed_category(&repo, "travel", true);
    let post = seed_post(
        &repo,
        PostSeed {
            author_id: author.id,
            category_id: Some(category.id),
            pub_date: now() - Duration::hours(1),
            is_published: true,
        },
    );

    repo.delete_category(category.id)
        .expect("should delete category");

    let stored = repo
        .get_post_by_id(post.id)
        .expect("should read post")
        .expect("post should survive category deletion");
    assert_eq!(stored.category_id, None);

    // An uncategorized post no longer passes the gate.
    let (total, _) = repo
        .list_posts(PostListQuery::public())
        .expect("should list posts");
    assert_eq!(total, 0);
}

#[test]
fn deleting_a_location_detaches_its_posts() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let author = seed_user(&repo, "alice");
    let category = seed_category(&repo, "travel", true);
    let location = seed_location(&repo, "Paris");

    use blogr::domain::types::{PostBody, PostTitle};
    let post = repo
        .create_post(&NewPost {
            author_id: author.id,
            category_id: Some(category.id),
            location_id: Some(location.id),
            title: PostTitle::new("A post").expect("valid title"),
            body: PostBody::new("Body").expect("valid body"),
            pub_date: now() - Duration::hours(1),
            image: None,
            is_published: true,
            created_at: now(),
        })
        .expect("should create post");

    repo.delete_location(location.id)
        .expect("should delete location");

    let stored = repo
        .get_post_by_id(post.id)
        .expect("should read post")
        .expect("post should survive location deletion");
    assert_eq!(stored.location_id, None);

    // Unlike a category, a location is not part of the publish gate.
    let (total, previews) = repo
        .list_posts(PostListQuery::public())
        .expect("should list posts");
    assert_eq!(total, 1);
    assert!(previews[0].location.is_none());
}

#[test]
fn out_of_range_page_numbers_yield_an_empty_page() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let author = seed_user(&repo, "alice");
    let category = seed_category(&repo, "travel", true);
    seed_post(
        &repo,
        PostSeed {
            author_id: author.id,
            category_id: Some(category.id),
            pub_date: now() - Duration::hours(1),
            is_published: true,
        },
    );

    let (total, previews) = repo
        .list_posts(PostListQuery::public().paginate(usize::MAX, 10))
        .expect("should list posts");
    assert_eq!(total, 1);
    assert!(previews.is_empty());
}

#[test]
fn deleting_a_post_removes_its_comments() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let author = seed_user(&repo, "alice");
    let category = seed_category(&repo, "travel", true);
    let post = seed_post(
        &repo,
        PostSeed {
            author_id: author.id,
            category_id: Some(category.id),
            pub_date: now() - Duration::hours(1),
            is_published: true,
        },
    );
    seed_comment(&repo, post.id, author.id, "first");
    seed_comment(&repo, post.id, author.id, "second");

    repo.delete_post(post.id).expect("should delete post");

    assert!(
        repo.get_post_by_id(post.id)
            .expect("should query post")
            .is_none()
    );
    let comments = repo
        .list_comments_for_post(post.id)
        .expect("should list comments");
    assert!(comments.is_empty());
}

#[test]
fn comments_are_listed_oldest_first_with_authors() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let alice = seed_user(&repo, "alice");
    let bob = seed_user(&repo, "bob");
    let category = seed_category(&repo, "travel", true);
    let post = seed_post(
        &repo,
        PostSeed {
            author_id: alice.id,
            category_id: Some(category.id),
            pub_date: now() - Duration::hours(1),
            is_published: true,
        },
    );

    use blogr::domain::types::CommentBody;
    repo.create_comment(&NewComment {
        post_id: post.id,
        author_id: alice.id,
        body: CommentBody::new("earlier").expect("valid body"),
        created_at: now() - Duration::minutes(10),
    })
    .expect("should create comment");
    repo.create_comment(&NewComment {
        post_id: post.id,
        author_id: bob.id,
        body: CommentBody::new("later").expect("valid body"),
        created_at: now(),
    })
    .expect("should create comment");

    let comments = repo
        .list_comments_for_post(post.id)
        .expect("should list comments");
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].comment.body.as_str(), "earlier");
    assert_eq!(comments[0].author.username.as_str(), "alice");
    assert_eq!(comments[1].author.username.as_str(), "bob");
}

#[test]
fn duplicate_usernames_are_rejected() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    use blogr::domain::types::{EmailAddress, Username};
    let new_user = |email: &str| NewUser {
        username: Username::new("alice").expect("valid username"),
        first_name: String::new(),
        last_name: String::new(),
        email: EmailAddress::new(email).expect("valid email"),
        password_hash: "hash".to_string(),
        created_at: now(),
    };

    repo.create_user(&new_user("a@example.com"))
        .expect("should create user");
    let err = repo
        .create_user(&new_user("b@example.com"))
        .expect_err("duplicate username should fail");
    assert!(err.is_unique_violation());
}

#[test]
fn profile_updates_are_persisted() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    use blogr::domain::types::EmailAddress;
    use blogr::domain::user::ProfilePatch;

    let user = seed_user(&repo, "alice");
    repo.update_profile(
        user.id,
        &ProfilePatch {
            first_name: "Alice".to_string(),
            last_name: "Liddell".to_string(),
            email: EmailAddress::new("new@example.com").expect("valid email"),
        },
    )
    .expect("should update profile");

    let stored = repo
        .get_user_by_id(user.id)
        .expect("should read user")
        .expect("user should exist");
    assert_eq!(stored.first_name, "Alice");
    assert_eq!(stored.email.as_str(), "new@example.com");
}
