//! Cross-layer tests for the marketplace crate
//! Services over the in-memory stores, and the router end to end.

#[cfg(test)]
mod fixtures {
    use std::sync::Arc;

    use accounts::application::{AccountsConfig, RegisterUseCase};
    use accounts::domain::validator::RegistrationInput;
    use accounts::MemoryAccountRepository;
    use kernel::id::{JobId, UserId};
    use kernel::validation::NumberInput;

    use crate::application::MarketConfig;
    use crate::domain::validator::{ApplyInput, JobInput, PostInput, ProductInput, ReviewInput};
    use crate::infra::store::MemoryMarketRepository;

    pub struct World {
        pub users: Arc<MemoryAccountRepository>,
        pub repo: Arc<MemoryMarketRepository>,
        pub config: Arc<MarketConfig>,
    }

    pub fn world() -> World {
        World {
            users: Arc::new(MemoryAccountRepository::memory()),
            repo: Arc::new(MemoryMarketRepository::memory()),
            config: Arc::new(MarketConfig::default()),
        }
    }

    pub async fn register(users: &Arc<MemoryAccountRepository>, email: &str) -> UserId {
        RegisterUseCase::new(users.clone(), Arc::new(AccountsConfig::development()))
            .execute(RegistrationInput {
                name: Some("Suresh Yadav".into()),
                email: Some(email.into()),
                password: Some("secret1".into()),
                mobile: None,
                location: Some("Indore".into()),
                user_type: None,
            })
            .await
            .unwrap()
            .id
    }

    pub fn product(title: &str) -> ProductInput {
        ProductInput {
            title: Some(title.into()),
            description: Some("Certified, 90% germination".into()),
            price: Some(NumberInput::Text("450".into())),
            category: Some("seeds".into()),
            location: Some("Ludhiana".into()),
            images: Some(vec!["https://img.example/seed.jpg".into()]),
            unit: Some("kg".into()),
            contact_phone: Some("9876543210".into()),
            ..Default::default()
        }
    }

    pub fn post(title: &str) -> PostInput {
        PostInput {
            title: Some(title.into()),
            content: Some("Leaves turning yellow after the first irrigation".into()),
            tags: Some(vec!["wheat".into(), "disease".into()]),
            category: Some("question".into()),
            ..Default::default()
        }
    }

    pub fn job(title: &str) -> JobInput {
        JobInput {
            title: Some(title.into()),
            description: Some("Harvest help for three weeks".into()),
            job_type: Some("seasonal".into()),
            location: Some("Nashik".into()),
            skills: Some(vec!["harvesting".into(), " ".into(), "tractor".into()]),
            ..Default::default()
        }
    }

    pub fn apply(job: JobId) -> ApplyInput {
        ApplyInput {
            job_id: Some(job.to_string()),
            message: Some("Available from Monday".into()),
            contact: None,
        }
    }

    pub fn stars(n: u8) -> ReviewInput {
        ReviewInput {
            rating: Some(NumberInput::Number(f64::from(n))),
            text: None,
        }
    }
}

#[cfg(test)]
mod listing_tests {
    use kernel::id::UserId;
    use tokio_test::{assert_err, assert_ok};

    use super::fixtures::*;
    use crate::application::{JobService, PostService, ProductService};
    use crate::domain::filter::{Page, PostFilter, ProductFilter};
    use crate::domain::validator::{CommentInput, JobInput, PostInput, ProductInput};
    use crate::domain::value_objects::{JobStatus, ProductStatus};
    use crate::error::MarketError;

    #[tokio::test]
    async fn test_create_requires_image_and_contact_phone() {
        let w = world();
        let service = ProductService::new(w.repo.clone(), w.config.clone());

        let mut input = product("Hybrid maize seed");
        input.images = None;
        input.contact_phone = Some("5123456789".into());

        let err = service.create(UserId::new(), input).await.unwrap_err();
        let MarketError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        assert_eq!(fields.get("images"), Some("Please upload at least one image"));
        assert_eq!(
            fields.get("contactPhone"),
            Some("Please enter a valid Indian mobile number")
        );

        let mut input = product("Hybrid maize seed");
        input.contact_phone = Some("9876543210".into());
        assert_ok!(service.create(UserId::new(), input).await);
    }

    #[tokio::test]
    async fn test_non_owner_update_and_delete_leave_listing_unchanged() {
        let w = world();
        let service = ProductService::new(w.repo.clone(), w.config.clone());
        let seller = UserId::new();
        let intruder = UserId::new();

        let created = service.create(seller, product("Neem cake")).await.unwrap();
        let before = serde_json::to_value(&created).unwrap();

        let patch = ProductInput {
            title: Some("Stolen".into()),
            ..Default::default()
        };
        let err = service.update(created.id, intruder, patch).await.unwrap_err();
        assert!(matches!(err, MarketError::Forbidden(_)));

        let err = service.delete(created.id, intruder).await.unwrap_err();
        assert!(matches!(err, MarketError::Forbidden(_)));

        let after = serde_json::to_value(service.get(created.id).await.unwrap()).unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_owner_update_merges_patch() {
        let w = world();
        let service = ProductService::new(w.repo.clone(), w.config.clone());
        let seller = UserId::new();
        let created = service.create(seller, product("Neem cake")).await.unwrap();

        let updated = service
            .update(
                created.id,
                seller,
                ProductInput {
                    status: Some("sold".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, ProductStatus::Sold);
        assert_eq!(updated.title, "Neem cake");

        let err = service
            .update(
                created.id,
                seller,
                ProductInput {
                    price: Some(kernel::validation::NumberInput::Number(0.0)),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, MarketError::Validation(ref f) if f.contains("price")));
        assert_eq!(service.get(created.id).await.unwrap().status, ProductStatus::Sold);
    }

    #[tokio::test]
    async fn test_owner_delete_and_not_found() {
        let w = world();
        let service = JobService::new(w.repo.clone(), w.config.clone());
        let employer = UserId::new();
        let job = service.create(employer, job("Grape pruning")).await.unwrap();

        assert_ok!(service.delete(job.id, employer).await);
        assert!(matches!(
            service.get(job.id).await,
            Err(MarketError::NotFound("Job"))
        ));
        assert!(matches!(
            service.delete(job.id, employer).await,
            Err(MarketError::NotFound("Job"))
        ));
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let w = world();
        let service = ProductService::new(w.repo.clone(), w.config.clone());
        let seller = UserId::new();

        let organic = service.create(seller, product("Organic Tomatoes")).await.unwrap();
        service.create(seller, product("Basmati Rice")).await.unwrap();

        let hits = service
            .list(&ProductFilter::default(), Page::default(), Some("organic"), None)
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, organic.id);
    }

    #[tokio::test]
    async fn test_list_filters_and_pages_newest_first() {
        let w = world();
        let service = PostService::new(w.repo.clone(), w.config.clone());
        let author = UserId::new();

        let mut ids = Vec::new();
        for i in 0..5 {
            ids.push(service.create(author, post(&format!("Question {i}"))).await.unwrap().id);
        }
        let mut tips = post("Mulching tips");
        tips.category = Some("tips_tricks".into());
        tips.tags = Some(vec!["mulch".into()]);
        service.create(UserId::new(), tips).await.unwrap();

        let page = service
            .list(
                &PostFilter {
                    author: Some(author.to_string()),
                    ..Default::default()
                },
                Page { page: Some(1), limit: Some(2) },
                None,
                None,
            )
            .await
            .unwrap();
        assert_eq!(page.iter().map(|p| p.id).collect::<Vec<_>>(), vec![ids[4], ids[3]]);

        let wheat = service
            .list(
                &PostFilter {
                    tag: Some("wheat".into()),
                    ..Default::default()
                },
                Page::default(),
                None,
                None,
            )
            .await
            .unwrap();
        assert_eq!(wheat.len(), 5);

        let err = service
            .list(
                &PostFilter {
                    category: Some("Question".into()),
                    ..Default::default()
                },
                Page::default(),
                None,
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, MarketError::Validation(ref f) if f.contains("category")));
    }

    #[tokio::test]
    async fn test_likes_are_deduplicated_and_comments_required() {
        let w = world();
        let service = PostService::new(w.repo.clone(), w.config.clone());
        let author = UserId::new();
        let reader = UserId::new();
        let created = service.create(author, post("Yellow leaves")).await.unwrap();

        service.like(created.id, reader).await.unwrap();
        let liked = service.like(created.id, reader).await.unwrap();
        assert_eq!(liked.likes(), &[reader]);
        let unliked = service.unlike(created.id, reader).await.unwrap();
        assert!(unliked.likes().is_empty());

        let err = service
            .comment(created.id, reader, CommentInput { text: Some("  ".into()) })
            .await
            .unwrap_err();
        assert!(matches!(err, MarketError::Validation(ref f) if f.contains("text")));

        let comment = service
            .comment(created.id, reader, CommentInput { text: Some("Try urea".into()) })
            .await
            .unwrap();
        assert_eq!(comment.user, reader);
        assert_eq!(service.get(created.id).await.unwrap().comments().len(), 1);
    }

    #[tokio::test]
    async fn test_only_author_resolves_post() {
        let w = world();
        let service = PostService::new(w.repo.clone(), w.config.clone());
        let author = UserId::new();
        let created = service.create(author, post("Yellow leaves")).await.unwrap();

        assert_err!(service.set_resolved(created.id, UserId::new(), true).await);
        let resolved = service.set_resolved(created.id, author, true).await.unwrap();
        assert!(resolved.is_resolved);

        let patched = service
            .update(
                created.id,
                author,
                PostInput {
                    is_resolved: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(!patched.is_resolved);
    }

    #[tokio::test]
    async fn test_job_update_validates_dates_and_closes() {
        let w = world();
        let service = JobService::new(w.repo.clone(), w.config.clone());
        let employer = UserId::new();
        let created = service.create(employer, job("Sugarcane cutting")).await.unwrap();
        assert_eq!(created.skills, vec!["harvesting", "tractor"]);

        let err = service
            .update(
                created.id,
                employer,
                JobInput {
                    start_date: Some("2026-11-10".into()),
                    end_date: Some("2026-11-01".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, MarketError::Validation(ref f) if f.contains("endDate")));

        let closed = service
            .update(
                created.id,
                employer,
                JobInput {
                    status: Some("filled".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(closed.status, JobStatus::Filled);
    }

    #[tokio::test]
    async fn test_storage_unavailable_fails_closed() {
        let w = world();
        let service = ProductService::new(w.repo.clone(), w.config.clone());
        w.repo.set_available(false);

        let err = service.create(UserId::new(), product("Sprayer")).await.unwrap_err();
        assert!(matches!(err, MarketError::StorageUnavailable(_)));
        let err = service
            .list(&ProductFilter::default(), Page::default(), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, MarketError::StorageUnavailable(_)));
    }
}

#[cfg(test)]
mod review_tests {
    use accounts::UserRepository;
    use kernel::id::{ProductId, UserId};

    use super::fixtures::*;
    use crate::application::{ProductService, ReviewService};
    use crate::domain::validator::ReviewInput;
    use crate::error::MarketError;

    #[tokio::test]
    async fn test_average_is_mean_of_stored_reviews() {
        let w = world();
        let seller = register(&w.users, "seller@farm.in").await;
        let products = ProductService::new(w.repo.clone(), w.config.clone());
        let reviews = ReviewService::new(w.repo.clone(), w.users.clone());

        let created = products.create(seller, product("Vermicompost")).await.unwrap();
        assert_eq!(created.average_rating(), 0.0);

        let mut expected: Vec<u8> = Vec::new();
        for n in [5, 2, 4, 4, 1] {
            expected.push(n);
            let outcome = reviews.add(created.id, UserId::new(), stars(n)).await.unwrap();
            let mean = expected.iter().map(|&s| f64::from(s)).sum::<f64>() / expected.len() as f64;
            assert!((outcome.product.average_rating() - mean).abs() < 1e-9);
            assert_eq!(outcome.review.rating.stars(), n);
        }

        let stored = products.get(created.id).await.unwrap();
        assert_eq!(stored.reviews().len(), 5);
        assert!((stored.average_rating() - 3.2).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_removing_every_review_resets_average() {
        let w = world();
        let seller = register(&w.users, "seller@farm.in").await;
        let reviewer = UserId::new();
        let products = ProductService::new(w.repo.clone(), w.config.clone());
        let reviews = ReviewService::new(w.repo.clone(), w.users.clone());
        let created = products.create(seller, product("Vermicompost")).await.unwrap();

        reviews.add(created.id, reviewer, stars(4)).await.unwrap();
        reviews.add(created.id, UserId::new(), stars(2)).await.unwrap();

        let err = reviews.remove(created.id, 0, UserId::new()).await.unwrap_err();
        assert!(matches!(err, MarketError::Forbidden(_)));

        let outcome = reviews.remove(created.id, 0, reviewer).await.unwrap();
        assert_eq!(outcome.product.average_rating(), 2.0);
        let outcome = reviews.remove(created.id, 0, seller).await.unwrap();
        assert_eq!(outcome.product.average_rating(), 0.0);

        assert!(matches!(
            reviews.remove(created.id, 0, seller).await,
            Err(MarketError::NotFound("Review"))
        ));
    }

    #[tokio::test]
    async fn test_seller_rating_spans_all_products() {
        let w = world();
        let seller = register(&w.users, "seller@farm.in").await;
        let products = ProductService::new(w.repo.clone(), w.config.clone());
        let reviews = ReviewService::new(w.repo.clone(), w.users.clone());

        let a = products.create(seller, product("Chilli seed")).await.unwrap();
        let b = products.create(seller, product("Onion seed")).await.unwrap();
        let other = products.create(UserId::new(), product("Cotton seed")).await.unwrap();

        reviews.add(a.id, UserId::new(), stars(5)).await.unwrap();
        reviews.add(a.id, UserId::new(), stars(3)).await.unwrap();
        reviews.add(b.id, UserId::new(), stars(1)).await.unwrap();
        reviews.add(other.id, UserId::new(), stars(1)).await.unwrap();

        let account = w.users.find_by_id(seller).await.unwrap().unwrap();
        assert_eq!(account.review_count(), 3);
        assert!((account.rating() - 3.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_invalid_rating_and_missing_product() {
        let w = world();
        let reviews = ReviewService::new(w.repo.clone(), w.users.clone());

        let err = reviews
            .add(
                ProductId::new(),
                UserId::new(),
                ReviewInput {
                    rating: Some(kernel::validation::NumberInput::Number(6.0)),
                    text: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, MarketError::Validation(ref f) if f.contains("rating")));

        let err = reviews.add(ProductId::new(), UserId::new(), stars(3)).await.unwrap_err();
        assert!(matches!(err, MarketError::NotFound("Product")));
    }
}

#[cfg(test)]
mod application_tests {
    use kernel::id::{JobId, UserId};
    use tokio_test::assert_ok;

    use super::fixtures::*;
    use crate::application::{ApplicationService, JobService};
    use crate::domain::validator::{ApplicantContactInput, ApplyInput, JobInput};
    use crate::domain::value_objects::{ApplicationStatus, JobStatus};
    use crate::error::MarketError;

    #[tokio::test]
    async fn test_second_application_is_rejected_and_first_kept() {
        let w = world();
        let employer = UserId::new();
        let worker = UserId::new();
        let job = JobService::new(w.repo.clone(), w.config.clone())
            .create(employer, job("Paddy transplanting"))
            .await
            .unwrap();
        let service = ApplicationService::new(w.repo.clone());

        let first = service.apply(worker, apply(job.id)).await.unwrap();
        assert_eq!(first.status, ApplicationStatus::Pending);

        let mut again = apply(job.id);
        again.message = Some("Second try".into());
        let err = service.apply(worker, again).await.unwrap_err();
        assert!(matches!(err, MarketError::DuplicateApplication));

        let records = service.list_applicants(job.id, employer).await.unwrap();
        assert_eq!(records, vec![first]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_applications_yield_one_record() {
        let w = world();
        let employer = UserId::new();
        let worker = UserId::new();
        let job = JobService::new(w.repo.clone(), w.config.clone())
            .create(employer, job("Cotton picking"))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let service = ApplicationService::new(w.repo.clone());
            let input = apply(job.id);
            handles.push(tokio::spawn(async move { service.apply(worker, input).await }));
        }

        let mut accepted = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => accepted += 1,
                Err(MarketError::DuplicateApplication) => {}
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(accepted, 1);

        let records = ApplicationService::new(w.repo.clone())
            .list_applicants(job.id, employer)
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn test_terminal_status_is_frozen() {
        let w = world();
        let employer = UserId::new();
        let worker = UserId::new();
        let job = JobService::new(w.repo.clone(), w.config.clone())
            .create(employer, job("Tractor driver"))
            .await
            .unwrap();
        let service = ApplicationService::new(w.repo.clone());
        service.apply(worker, apply(job.id)).await.unwrap();

        let reviewed = service
            .set_status(job.id, worker, ApplicationStatus::Reviewed, employer)
            .await
            .unwrap();
        assert_eq!(reviewed.status, ApplicationStatus::Reviewed);
        assert_ok!(
            service
                .set_status(job.id, worker, ApplicationStatus::Accepted, employer)
                .await
        );

        for next in [
            ApplicationStatus::Rejected,
            ApplicationStatus::Pending,
            ApplicationStatus::Reviewed,
            ApplicationStatus::Accepted,
        ] {
            let err = service.set_status(job.id, worker, next, employer).await.unwrap_err();
            assert!(matches!(
                err,
                MarketError::InvalidTransition { from: ApplicationStatus::Accepted, .. }
            ));
        }

        let mine = service.my_application(job.id, worker).await.unwrap();
        assert_eq!(mine.status, ApplicationStatus::Accepted);
    }

    #[tokio::test]
    async fn test_pending_may_skip_review() {
        let w = world();
        let employer = UserId::new();
        let worker = UserId::new();
        let job = JobService::new(w.repo.clone(), w.config.clone())
            .create(employer, job("Dairy hand"))
            .await
            .unwrap();
        let service = ApplicationService::new(w.repo.clone());
        service.apply(worker, apply(job.id)).await.unwrap();

        let rejected = service
            .set_status(job.id, worker, ApplicationStatus::Rejected, employer)
            .await
            .unwrap();
        assert_eq!(rejected.status, ApplicationStatus::Rejected);
    }

    #[tokio::test]
    async fn test_only_employer_manages_applicants() {
        let w = world();
        let employer = UserId::new();
        let worker = UserId::new();
        let job = JobService::new(w.repo.clone(), w.config.clone())
            .create(employer, job("Orchard guard"))
            .await
            .unwrap();
        let service = ApplicationService::new(w.repo.clone());
        service.apply(worker, apply(job.id)).await.unwrap();

        let err = service
            .set_status(job.id, worker, ApplicationStatus::Accepted, worker)
            .await
            .unwrap_err();
        assert!(matches!(err, MarketError::Forbidden(_)));
        assert!(matches!(
            service.list_applicants(job.id, worker).await,
            Err(MarketError::Forbidden(_))
        ));

        let mine = service.my_application(job.id, worker).await.unwrap();
        assert_eq!(mine.status, ApplicationStatus::Pending);
        assert!(matches!(
            service.my_application(job.id, UserId::new()).await,
            Err(MarketError::NotFound("Application"))
        ));
    }

    #[tokio::test]
    async fn test_missing_or_closed_job() {
        let w = world();
        let employer = UserId::new();
        let service = ApplicationService::new(w.repo.clone());

        let err = service.apply(UserId::new(), apply(JobId::new())).await.unwrap_err();
        assert!(matches!(err, MarketError::NotFound("Job")));

        let jobs = JobService::new(w.repo.clone(), w.config.clone());
        let created = jobs.create(employer, job("Night irrigation")).await.unwrap();
        jobs.update(
            created.id,
            employer,
            JobInput {
                status: Some("closed".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let err = service.apply(UserId::new(), apply(created.id)).await.unwrap_err();
        assert!(matches!(err, MarketError::JobClosed(JobStatus::Closed)));
    }

    #[tokio::test]
    async fn test_contact_details_are_validated() {
        let w = world();
        let job = JobService::new(w.repo.clone(), w.config.clone())
            .create(UserId::new(), job("Poultry farm helper"))
            .await
            .unwrap();
        let service = ApplicationService::new(w.repo.clone());

        let input = ApplyInput {
            job_id: Some(job.id.to_string()),
            message: None,
            contact: Some(ApplicantContactInput {
                full_name: Some("Anil".into()),
                contact_number: Some("5123456789".into()),
                email: Some("anil@".into()),
                ..Default::default()
            }),
        };
        let err = service.apply(UserId::new(), input).await.unwrap_err();
        let MarketError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        for field in ["contact.contactNumber", "contact.email", "contact.address", "contact.region"] {
            assert!(fields.contains(field), "missing error for {field}");
        }

        let input = ApplyInput {
            job_id: Some(job.id.to_string()),
            message: None,
            contact: Some(ApplicantContactInput {
                full_name: Some("Anil".into()),
                contact_number: Some("9876543210".into()),
                address: Some("Ward 4".into()),
                region: Some("Vidarbha".into()),
                ..Default::default()
            }),
        };
        let record = service.apply(UserId::new(), input).await.unwrap();
        assert_eq!(record.contact.unwrap().full_name, "Anil");
    }
}

#[cfg(test)]
mod saved_item_tests {
    use accounts::domain::{SavedItem, SavedItemType};
    use kernel::id::{JobId, TutorialId, UserId};

    use super::fixtures::*;
    use crate::application::{JobService, PostService, SavedEntry, SavedItemService};
    use crate::error::MarketError;

    #[tokio::test]
    async fn test_save_list_and_remove() {
        let w = world();
        let user = register(&w.users, "saver@farm.in").await;
        let service = SavedItemService::new(w.users.clone(), w.repo.clone(), w.repo.clone(), w.repo.clone());

        let job = JobService::new(w.repo.clone(), w.config.clone())
            .create(UserId::new(), job("Milking"))
            .await
            .unwrap();
        let post = PostService::new(w.repo.clone(), w.config.clone())
            .create(UserId::new(), post("Fodder prices"))
            .await
            .unwrap();
        let tutorial = TutorialId::new();

        service.save(user, SavedItem::Job(job.id)).await.unwrap();
        let saved = service.save(user, SavedItem::Job(job.id)).await.unwrap();
        assert_eq!(saved.len(), 1);
        service.save(user, SavedItem::Post(post.id)).await.unwrap();
        service.save(user, SavedItem::Tutorial(tutorial)).await.unwrap();

        let all = service.list(user, None).await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(matches!(&all[0], SavedEntry::Job(j) if j.id == job.id));
        assert!(matches!(&all[2], SavedEntry::Tutorial(t) if *t == tutorial));

        let jobs = service.list(user, Some(SavedItemType::Job)).await.unwrap();
        assert_eq!(jobs.len(), 1);

        let left = service.remove(user, SavedItem::Job(job.id)).await.unwrap();
        assert_eq!(left.len(), 2);
        let left = service.remove(user, SavedItem::Job(job.id)).await.unwrap();
        assert_eq!(left.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_listing_cannot_be_saved() {
        let w = world();
        let user = register(&w.users, "saver@farm.in").await;
        let service = SavedItemService::new(w.users.clone(), w.repo.clone(), w.repo.clone(), w.repo.clone());

        let err = service.save(user, SavedItem::Job(JobId::new())).await.unwrap_err();
        assert!(matches!(err, MarketError::NotFound("Job")));

        let err = service
            .save(UserId::new(), SavedItem::Tutorial(TutorialId::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, MarketError::NotFound("User")));
    }

    #[tokio::test]
    async fn test_deleted_listing_is_skipped() {
        let w = world();
        let user = register(&w.users, "saver@farm.in").await;
        let employer = UserId::new();
        let jobs = JobService::new(w.repo.clone(), w.config.clone());
        let service = SavedItemService::new(w.users.clone(), w.repo.clone(), w.repo.clone(), w.repo.clone());

        let job = jobs.create(employer, job("Fencing")).await.unwrap();
        service.save(user, SavedItem::Job(job.id)).await.unwrap();
        jobs.delete(job.id, employer).await.unwrap();

        assert!(service.list(user, None).await.unwrap().is_empty());
    }
}

#[cfg(test)]
mod search_tests {
    use kernel::id::UserId;

    use super::fixtures::*;
    use crate::application::{JobService, PostService, ProductService, SearchService};

    #[tokio::test]
    async fn test_search_across_listing_types() {
        let w = world();
        let someone = UserId::new();
        ProductService::new(w.repo.clone(), w.config.clone())
            .create(someone, product("Wheat seed HD-2967"))
            .await
            .unwrap();
        ProductService::new(w.repo.clone(), w.config.clone())
            .create(someone, product("Power tiller"))
            .await
            .unwrap();
        PostService::new(w.repo.clone(), w.config.clone())
            .create(someone, post("Rust on leaves"))
            .await
            .unwrap();
        JobService::new(w.repo.clone(), w.config.clone())
            .create(someone, job("Wheat harvest crew"))
            .await
            .unwrap();

        let search = SearchService::new(w.repo.clone(), w.repo.clone(), w.repo.clone());

        let results = search.search_across(Some("WHEAT")).await.unwrap();
        assert_eq!(results.products.len(), 1);
        assert_eq!(results.posts.len(), 1, "post tags are searched");
        assert_eq!(results.jobs.len(), 1);

        let everything = search.search_across(None).await.unwrap();
        assert_eq!(everything.products.len(), 2);
        assert_eq!(everything.products[0].title, "Power tiller");
    }
}

#[cfg(test)]
mod router_tests {
    use std::sync::Arc;

    use accounts::MemoryAccountRepository;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use kernel::id::UserId;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::fixtures::register;
    use crate::application::MarketConfig;
    use crate::infra::store::MemoryMarketRepository;
    use crate::presentation::router::marketplace_router;

    fn app_with(users: Arc<MemoryAccountRepository>) -> axum::Router {
        marketplace_router(
            users,
            Arc::new(MemoryMarketRepository::memory()),
            MarketConfig::development(),
        )
    }

    fn app() -> axum::Router {
        app_with(Arc::new(MemoryAccountRepository::memory()))
    }

    fn request(method: &str, uri: &str, user: Option<UserId>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header("X-User-Id", user.to_string());
        }
        match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn product_body() -> Value {
        json!({
            "title": "Organic Jaggery",
            "description": "Chemical free, 1 kg blocks",
            "price": "120",
            "category": "other",
            "location": "Kolhapur",
            "images": ["https://img.example/jaggery.jpg"],
            "unit": "kg",
            "contactPhone": "9876543210"
        })
    }

    #[tokio::test]
    async fn test_create_requires_identity() {
        let response = app()
            .oneshot(request("POST", "/products", None, Some(product_body())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_product_lifecycle() {
        let app = app();
        let seller = UserId::new();

        let response = app
            .clone()
            .oneshot(request("POST", "/products", Some(seller), Some(product_body())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["price"], 120.0);
        assert_eq!(body["averageRating"], 0.0);
        let id = body["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(request("GET", "/products?q=jaggery", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);

        let response = app
            .clone()
            .oneshot(request(
                "PUT",
                &format!("/products/{id}"),
                Some(UserId::new()),
                Some(json!({ "title": "Mine now" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                &format!("/products/{id}/reviews"),
                Some(UserId::new()),
                Some(json!({ "rating": 4, "text": "Good taste" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await["averageRating"], 4.0);

        let response = app
            .clone()
            .oneshot(request("DELETE", &format!("/products/{id}"), Some(seller), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .clone()
            .oneshot(request("GET", &format!("/products/{id}"), None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_validation_errors_are_field_mapped() {
        let response = app()
            .oneshot(request(
                "POST",
                "/products",
                Some(UserId::new()),
                Some(json!({ "price": "abc", "category": "Seeds", "contactPhone": "5123456789" })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        for field in ["title", "description", "location", "price", "category", "images", "contactPhone"] {
            assert!(body["errors"][field].is_string(), "missing error for {field}");
        }
    }

    #[tokio::test]
    async fn test_application_flow_status_codes() {
        let app = app();
        let employer = UserId::new();
        let worker = UserId::new();

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/jobs",
                Some(employer),
                Some(json!({
                    "title": "Mango picking",
                    "description": "Two weeks in May",
                    "jobType": "seasonal",
                    "location": "Ratnagiri",
                    "salary": { "amount": 600, "period": "daily" }
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let job_id = body_json(response).await["id"].as_str().unwrap().to_string();

        let apply = json!({ "jobId": job_id, "message": "I have done this before" });
        let response = app
            .clone()
            .oneshot(request("POST", "/applications", Some(worker), Some(apply.clone())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await["status"], "pending");

        let response = app
            .clone()
            .oneshot(request("POST", "/applications", Some(worker), Some(apply)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let status_uri = format!("/jobs/{job_id}/applicants/{worker}");
        let response = app
            .clone()
            .oneshot(request("PUT", &status_uri, Some(worker), Some(json!({ "status": "accepted" }))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .clone()
            .oneshot(request("PUT", &status_uri, Some(employer), Some(json!({ "status": "rejected" }))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(request("PUT", &status_uri, Some(employer), Some(json!({ "status": "accepted" }))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = app
            .clone()
            .oneshot(request("GET", &format!("/jobs/{job_id}/application"), Some(worker), None))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["status"], "rejected");
    }

    #[tokio::test]
    async fn test_public_job_views_hide_applicant_contacts() {
        let app = app();
        let employer = UserId::new();

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/jobs",
                Some(employer),
                Some(json!({
                    "title": "Sugarcane harvest",
                    "description": "Cutting crew for March",
                    "jobType": "seasonal",
                    "location": "Kolhapur"
                })),
            ))
            .await
            .unwrap();
        let created = body_json(response).await;
        assert!(created.get("applicants").is_none());
        assert_eq!(created["applicantCount"], 0);
        let job_id = created["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/applications",
                Some(UserId::new()),
                Some(json!({
                    "jobId": job_id,
                    "contact": {
                        "fullName": "Ravi Shinde",
                        "contactNumber": "9876543210",
                        "address": "12 Main Rd, Karad",
                        "region": "Maharashtra"
                    }
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        for uri in [format!("/jobs/{job_id}"), "/jobs".to_string(), "/search?q=sugarcane".to_string()] {
            let response = app.clone().oneshot(request("GET", &uri, None, None)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let body = body_json(response).await;
            let text = body.to_string();
            assert!(!text.contains("Ravi Shinde"), "{uri} exposed an applicant name");
            assert!(!text.contains("9876543210"), "{uri} exposed an applicant number");
            assert!(!text.contains("\"applicants\""), "{uri} exposed the applicant list");

            let job = match uri.as_str() {
                "/jobs" => body[0].clone(),
                "/search?q=sugarcane" => body["jobs"][0].clone(),
                _ => body,
            };
            assert_eq!(job["applicantCount"], 1);
        }

        let response = app
            .clone()
            .oneshot(request("GET", &format!("/jobs/{job_id}/applicants"), Some(employer), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await[0]["contact"]["fullName"], "Ravi Shinde");
    }

    #[tokio::test]
    async fn test_saved_jobs_routes() {
        let users = Arc::new(MemoryAccountRepository::memory());
        let user = register(&users, "jobseeker@farm.in").await;
        let app = app_with(users);

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/jobs",
                Some(UserId::new()),
                Some(json!({
                    "title": "Goat herder",
                    "description": "Permanent role",
                    "jobType": "permanent",
                    "location": "Barmer"
                })),
            ))
            .await
            .unwrap();
        let job_id = body_json(response).await["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(request("POST", "/saved-jobs", Some(user), Some(json!({ "jobId": job_id }))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await["savedItems"][0],
            json!({ "itemType": "Job", "itemId": job_id })
        );

        let response = app
            .clone()
            .oneshot(request("GET", "/saved-jobs", Some(user), None))
            .await
            .unwrap();
        let jobs = body_json(response).await;
        assert_eq!(jobs[0]["title"], "Goat herder");
        assert_eq!(jobs[0]["applicantCount"], 0);

        let response = app
            .clone()
            .oneshot(request("DELETE", &format!("/saved-jobs/{job_id}"), Some(user), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_json(response).await["savedItems"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let response = app()
            .oneshot(request("GET", "/posts/not-a-uuid", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_search_route() {
        let response = app()
            .oneshot(request("GET", "/search?q=anything", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["products"].as_array().unwrap().is_empty());
        assert!(body["posts"].is_array());
        assert!(body["jobs"].is_array());
    }
}
