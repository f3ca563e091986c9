mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use common::FakeBackend;
use office_client::{ApiClient, ClientError, Debouncer, ListController, Method, Resource, TokioScheduler};
use office_types::{Brand, BrandDraft, BrandPatch, EntityKind, ListQuery};

type Brands = Resource<Brand, Arc<FakeBackend>>;

fn brands(backend: &Arc<FakeBackend>) -> Arc<Brands> {
    let api = Arc::new(ApiClient::new(backend.clone()));
    Arc::new(Resource::new(api))
}

fn names(brands: &[Brand]) -> Vec<&str> {
    brands.iter().map(|b| b.name.as_str()).collect()
}

#[tokio::test]
async fn created_brand_appears_in_next_list_read() {
    let backend = Arc::new(FakeBackend::with_brands(&["Bravo"]));
    let resource = brands(&backend);
    let query = ListQuery::first(5);

    let before = resource.list_page(&query).await.unwrap();
    assert_eq!(names(&before.content), ["Bravo"]);
    resource.list_page(&query).await.unwrap();
    assert_eq!(backend.count(Method::Get, "api/brands"), 1);

    let created = resource
        .create(&BrandDraft {
            name: "Acme".into(),
            is_active: true,
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(created.name, "Acme");

    let after = resource.list_page(&query).await.unwrap();
    assert_eq!(backend.count(Method::Get, "api/brands"), 2);
    assert_eq!(names(&after.content), ["Bravo", "Acme"]);
    assert_eq!(after.total_elements, 2);
}

#[tokio::test]
async fn missing_or_zero_id_sends_nothing() {
    let backend = Arc::new(FakeBackend::with_brands(&["Bravo"]));
    let resource = brands(&backend);

    assert_eq!(resource.get_by_id(None).await.unwrap(), None);
    assert_eq!(resource.get_by_id(Some(0)).await.unwrap(), None);
    assert!(backend.requests().is_empty());

    let found = resource.get_by_id(Some(1)).await.unwrap().unwrap();
    assert_eq!(found.name, "Bravo");
    resource.get_by_id(Some(1)).await.unwrap();
    assert_eq!(backend.count(Method::Get, "api/brands/1"), 1);
}

#[tokio::test]
async fn failed_write_keeps_cache_and_reports_status() {
    let backend = Arc::new(FakeBackend::with_brands(&["Bravo"]));
    let resource = brands(&backend);
    let query = ListQuery::first(5);
    resource.list_page(&query).await.unwrap();

    let notified = Arc::new(Mutex::new(0));
    let sink = notified.clone();
    resource.subscribe(move |_| *sink.lock().unwrap() += 1);

    backend.fail_next(500);
    let err = resource
        .create(&BrandDraft {
            name: "Acme".into(),
            is_active: true,
        })
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ClientError::Server {
            status: 500,
            message: "falha simulada".into()
        }
    );

    let page = resource.list_page(&query).await.unwrap();
    assert_eq!(names(&page.content), ["Bravo"]);
    assert_eq!(backend.count(Method::Get, "api/brands"), 1);
    assert_eq!(*notified.lock().unwrap(), 0);
}

#[tokio::test]
async fn invalid_draft_is_rejected_before_dispatch() {
    let backend = Arc::new(FakeBackend::with_brands(&[]));
    let resource = brands(&backend);

    let err = resource
        .create(&BrandDraft {
            name: "   ".into(),
            is_active: true,
        })
        .await
        .unwrap_err();
    assert_eq!(err.status(), 422);
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn update_refreshes_item_and_lists() {
    let backend = Arc::new(FakeBackend::with_brands(&["Bravo"]));
    let resource = brands(&backend);
    let query = ListQuery::first(5);
    resource.list_page(&query).await.unwrap();
    resource.get_by_id(Some(1)).await.unwrap();

    let patch = BrandPatch {
        name: Some("Bravo Ltda".into()),
        is_active: Some(false),
    };
    let updated = resource.update(1, &patch).await.unwrap().unwrap();
    assert!(!updated.is_active);

    let item = resource.get_by_id(Some(1)).await.unwrap().unwrap();
    assert_eq!(item.name, "Bravo Ltda");
    assert_eq!(backend.count(Method::Get, "api/brands/1"), 2);

    let page = resource.list_page(&query).await.unwrap();
    assert_eq!(names(&page.content), ["Bravo Ltda"]);
    assert_eq!(backend.count(Method::Get, "api/brands"), 2);
}

#[tokio::test]
async fn delete_returns_removed_record_and_drops_it_from_lists() {
    let backend = Arc::new(FakeBackend::with_brands(&["Acme", "Bravo"]));
    let resource = brands(&backend);
    let query = ListQuery::first(5);
    resource.list_page(&query).await.unwrap();

    let removed = resource.delete(1).await.unwrap().unwrap();
    assert_eq!(removed.name, "Acme");

    let page = resource.list_page(&query).await.unwrap();
    assert_eq!(names(&page.content), ["Bravo"]);
}

#[tokio::test]
async fn writes_notify_dependent_collections() {
    let backend = Arc::new(FakeBackend::with_brands(&[]));
    let resource = brands(&backend);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    resource.subscribe(move |kind| sink.lock().unwrap().push(kind));

    resource
        .create(&BrandDraft {
            name: "Acme".into(),
            is_active: true,
        })
        .await
        .unwrap();
    resource.delete(1).await.unwrap();

    assert_eq!(*seen.lock().unwrap(), [EntityKind::Brand, EntityKind::Brand]);
}

#[tokio::test(start_paused = true)]
async fn previous_page_stays_visible_while_refetching() {
    let backend = Arc::new(FakeBackend::with_brands(&["Acme", "Bravo"]));
    let controller = ListController::new(brands(&backend), ListQuery::first(5));

    let first = controller.refresh().await;
    assert_eq!(first.rows().len(), 2);

    backend.delay_search("br", Duration::from_millis(200));
    let probe = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        controller.snapshot()
    };
    let (settled, during) = tokio::join!(controller.set_search("br"), probe);

    assert!(during.is_fetching);
    assert_eq!(during.rows().len(), 2);
    assert!(!during.is_initial_load());
    assert!(!settled.is_fetching);
    assert_eq!(names(settled.rows()), ["Bravo"]);
}

#[tokio::test(start_paused = true)]
async fn late_response_for_older_query_is_ignored() {
    let backend = Arc::new(FakeBackend::with_brands(&["Acme", "Abacus", "Bravo"]));
    let controller = ListController::new(brands(&backend), ListQuery::first(5));
    backend.delay_search("a", Duration::from_millis(300));
    backend.delay_search("ab", Duration::from_millis(50));

    let newer = async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        controller.set_search("ab").await
    };
    tokio::join!(controller.set_search("a"), newer);

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.query.search.as_deref(), Some("ab"));
    assert_eq!(names(snapshot.rows()), ["Abacus"]);
    assert!(!snapshot.is_fetching);
}

#[tokio::test(start_paused = true)]
async fn debounced_typing_issues_one_search_request() {
    let backend = Arc::new(FakeBackend::with_brands(&["Acme", "Bravo"]));
    let controller = ListController::new(brands(&backend), ListQuery::first(5));

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<String>();
    let debouncer = Debouncer::new(
        Arc::new(TokioScheduler),
        Duration::from_millis(500),
        move |term: String| {
            let _ = tx.send(term);
        },
    );

    for prefix in ["a", "ac", "acm", "acme"] {
        debouncer.push(prefix.to_string());
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    let term = rx.recv().await.unwrap();
    assert_eq!(term, "acme");
    let snapshot = controller.set_search(&term).await;
    assert_eq!(names(snapshot.rows()), ["Acme"]);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(rx.try_recv().is_err());
    let searches = backend
        .requests()
        .iter()
        .filter(|r| r.query_value("search").is_some())
        .count();
    assert_eq!(searches, 1);
}

#[tokio::test]
async fn page_size_change_goes_back_to_first_page() {
    let backend = Arc::new(FakeBackend::with_brands(&["A1", "A2", "A3", "A4", "A5", "A6"]));
    let controller = ListController::new(brands(&backend), ListQuery::first(5));

    let second = controller.set_page(1).await;
    assert_eq!(names(second.rows()), ["A6"]);
    assert_eq!(second.page.as_ref().unwrap().total_pages, 2);

    let resized = controller.set_page_size(10).await;
    assert_eq!(resized.query.page, 0);
    assert_eq!(resized.rows().len(), 6);
}

#[tokio::test]
async fn subscribers_see_load_start_and_result() {
    let backend = Arc::new(FakeBackend::with_brands(&["Acme"]));
    let controller = ListController::new(brands(&backend), ListQuery::first(5));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    controller.subscribe(move |snapshot| {
        sink.lock()
            .unwrap()
            .push((snapshot.is_fetching, snapshot.rows().len()))
    });

    controller.refresh().await;
    controller.refresh().await;

    assert_eq!(
        *seen.lock().unwrap(),
        [(true, 0), (false, 1), (true, 1), (false, 1)]
    );
    assert_eq!(backend.count(Method::Get, "api/brands"), 1);
}
