use std::sync::Arc;

use loader::{
    Filters, FiltersUpdate, PRODUCTS_LOAD_FAILED, SHEET_LOAD_FAILED,
    SheetLoader,
};
use payloads::{SheetId, TankId};
use test_helpers::{
    nozzle_fixture, scripted::Call, sheet_fixture, tank_fixture,
};

use crate::{DIESEL, GASOLINE, day, loader_on_day, station};

#[tokio::test]
async fn mount_loads_products_and_the_selected_sheet() -> anyhow::Result<()> {
    let backend = station();
    backend.set_sheet(sheet_fixture(99, day(), GASOLINE));
    let loader = loader_on_day(&backend, Some(GASOLINE));

    loader.mount().await;

    let state = loader.state();
    assert_eq!(state.products.len(), 2);
    assert_eq!(state.sheet.as_ref().map(|s| s.id), Some(SheetId(99)));
    assert!(state.is_edit_mode());
    assert_eq!(state.tanks.len(), 1);
    assert_eq!(state.nozzles.len(), 2);
    assert!(
        state
            .nozzles
            .iter()
            .all(|n| n.tank_number.as_deref() == Some("T1"))
    );
    assert!(!state.status.loading);
    assert_eq!(state.status.error, None);
    Ok(())
}

#[tokio::test]
async fn missing_sheet_means_create_mode() -> anyhow::Result<()> {
    let backend = station();
    let loader = loader_on_day(&backend, None);

    assert!(loader.update_filters(FiltersUpdate::product(GASOLINE)).await);

    let state = loader.state();
    assert!(state.sheet.is_none());
    assert!(!state.is_edit_mode());
    assert_eq!(state.status.error, None);
    assert!(!state.status.loading);
    // The creation form still needs the product's tanks and nozzles.
    assert_eq!(state.tanks.len(), 1);
    assert_eq!(state.nozzles.len(), 2);
    Ok(())
}

#[tokio::test]
async fn nothing_is_requested_without_a_product() -> anyhow::Result<()> {
    let backend = station();
    let loader = SheetLoader::new(backend.clone());

    loader.mount().await;

    let state = loader.state();
    assert_eq!(state.products.len(), 2);
    assert!(state.sheet.is_none());
    assert!(!state.status.loading);
    assert_eq!(backend.calls(Call::Tanks(GASOLINE)), 0);
    assert_eq!(backend.calls(Call::Sheet(GASOLINE)), 0);
    Ok(())
}

#[tokio::test]
async fn clearing_the_product_clears_the_sheet() -> anyhow::Result<()> {
    let backend = station();
    backend.set_sheet(sheet_fixture(99, day(), GASOLINE));
    let loader = loader_on_day(&backend, Some(GASOLINE));
    loader.mount().await;

    assert!(loader.update_filters(FiltersUpdate::clear_product()).await);

    let state = loader.state();
    assert!(state.sheet.is_none());
    assert!(state.tanks.is_empty());
    assert!(state.nozzles.is_empty());
    assert!(!state.status.loading);
    assert_eq!(state.filters, Filters::new(Some(day()), None));
    Ok(())
}

#[tokio::test]
async fn clearing_the_product_mid_load_supersedes_it() -> anyhow::Result<()> {
    let backend = station();
    backend.set_sheet(sheet_fixture(99, day(), GASOLINE));
    let loader = loader_on_day(&backend, None);
    let gasoline_sheet = backend.hold(Call::Sheet(GASOLINE));

    tokio::join!(
        loader.update_filters(FiltersUpdate::product(GASOLINE)),
        async {
            loader.update_filters(FiltersUpdate::clear_product()).await;
            gasoline_sheet.open();
        },
    );

    let state = loader.state();
    assert_eq!(state.filters.product_id, None);
    assert!(state.sheet.is_none());
    assert!(state.tanks.is_empty());
    assert!(state.nozzles.is_empty());
    assert!(!state.status.loading);
    assert_eq!(state.status.error, None);
    assert_eq!(backend.calls(Call::Sheet(GASOLINE)), 1);
    Ok(())
}

#[tokio::test]
async fn unchanged_filters_do_not_reload() -> anyhow::Result<()> {
    let backend = station();
    let loader = loader_on_day(&backend, Some(GASOLINE));
    loader.mount().await;

    let changed = loader
        .update_filters(FiltersUpdate::date(day()).and_product(GASOLINE))
        .await;

    assert!(!changed);
    assert_eq!(backend.calls(Call::Sheet(GASOLINE)), 1);
    Ok(())
}

#[tokio::test]
async fn last_filter_change_wins() -> anyhow::Result<()> {
    let backend = station();
    backend.set_sheet(sheet_fixture(99, day(), GASOLINE));
    backend.set_sheet(sheet_fixture(100, day(), DIESEL));
    let loader = loader_on_day(&backend, None);
    let gasoline_sheet = backend.hold(Call::Sheet(GASOLINE));

    tokio::join!(
        loader.update_filters(FiltersUpdate::product(GASOLINE)),
        async {
            loader.update_filters(FiltersUpdate::product(DIESEL)).await;
            gasoline_sheet.open();
        },
    );

    let state = loader.state();
    assert_eq!(state.filters.product_id, Some(DIESEL));
    assert_eq!(state.sheet.as_ref().map(|s| s.id), Some(SheetId(100)));
    assert_eq!(state.tanks[0].id, Some(TankId(3)));
    assert_eq!(backend.calls(Call::Sheet(GASOLINE)), 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn last_filter_change_wins_across_threads() -> anyhow::Result<()> {
    let backend = station();
    backend.set_sheet(sheet_fixture(99, day(), GASOLINE));
    backend.set_sheet(sheet_fixture(100, day(), DIESEL));
    let loader = Arc::new(loader_on_day(&backend, None));

    let tasks: Vec<_> = (0..64)
        .map(|i| {
            let loader = loader.clone();
            let product_id = if i % 2 == 0 { GASOLINE } else { DIESEL };
            tokio::spawn(async move {
                loader
                    .update_filters(FiltersUpdate::product(product_id))
                    .await
            })
        })
        .collect();
    for task in tasks {
        task.await?;
    }

    let state = loader.state();
    let selected = state.filters.product_id;
    let (sheet_id, tank_id) = if selected == Some(GASOLINE) {
        (SheetId(99), TankId(1))
    } else {
        (SheetId(100), TankId(3))
    };
    assert_eq!(state.sheet.as_ref().map(|s| s.id), Some(sheet_id));
    assert_eq!(state.tanks[0].id, Some(tank_id));
    assert!(!state.status.loading);
    Ok(())
}

#[tokio::test]
async fn superseded_prerequisites_are_discarded() -> anyhow::Result<()> {
    let backend = station();
    let loader = loader_on_day(&backend, None);
    let gasoline_tanks = backend.hold(Call::Tanks(GASOLINE));

    tokio::join!(
        loader.update_filters(FiltersUpdate::product(GASOLINE)),
        async {
            loader.update_filters(FiltersUpdate::product(DIESEL)).await;
            gasoline_tanks.open();
        },
    );

    let state = loader.state();
    assert_eq!(state.tanks.len(), 1);
    assert_eq!(state.tanks[0].id, Some(TankId(3)));
    assert_eq!(state.nozzles.len(), 1);
    // The stale fetch still fills the cache for later.
    assert!(loader.resolver().cached(GASOLINE).is_some());
    assert_eq!(backend.calls(Call::Sheet(GASOLINE)), 0);
    Ok(())
}

#[tokio::test]
async fn superseded_failure_is_not_shown() -> anyhow::Result<()> {
    let backend = station();
    backend.fail(Call::Sheet(GASOLINE));
    let loader = loader_on_day(&backend, None);
    let gasoline_sheet = backend.hold(Call::Sheet(GASOLINE));

    tokio::join!(
        loader.update_filters(FiltersUpdate::product(GASOLINE)),
        async {
            loader.update_filters(FiltersUpdate::product(DIESEL)).await;
            gasoline_sheet.open();
        },
    );

    let state = loader.state();
    assert_eq!(state.status.error, None);
    assert!(!state.status.loading);
    Ok(())
}

#[tokio::test]
async fn loading_is_published_while_waiting() -> anyhow::Result<()> {
    let backend = station();
    let loader = loader_on_day(&backend, None);
    let updates = loader.subscribe();
    let sheet = backend.hold(Call::Sheet(GASOLINE));

    tokio::join!(
        loader.update_filters(FiltersUpdate::product(GASOLINE)),
        async {
            assert!(loader.state().status.loading);
            assert!(updates.has_changed().unwrap());
            sheet.open();
        },
    );

    assert!(!loader.state().status.loading);
    Ok(())
}

#[tokio::test]
async fn sheet_failure_shows_message_and_clears_sheet() -> anyhow::Result<()> {
    let backend = station();
    backend.set_sheet(sheet_fixture(99, day(), GASOLINE));
    let loader = loader_on_day(&backend, Some(GASOLINE));
    loader.mount().await;
    assert!(loader.state().is_edit_mode());

    backend.fail(Call::Sheet(GASOLINE));
    loader.refresh_sheet().await;

    let state = loader.state();
    assert!(state.sheet.is_none());
    assert!(!state.status.loading);
    assert_eq!(state.status.error.as_deref(), Some(SHEET_LOAD_FAILED));

    loader.clear_error();
    assert_eq!(loader.state().status.error, None);
    Ok(())
}

#[tokio::test]
async fn tank_failure_shows_sheet_message() -> anyhow::Result<()> {
    let backend = station();
    backend.fail(Call::Tanks(GASOLINE));
    let loader = loader_on_day(&backend, None);

    loader.update_filters(FiltersUpdate::product(GASOLINE)).await;

    let state = loader.state();
    assert_eq!(state.status.error.as_deref(), Some(SHEET_LOAD_FAILED));
    assert!(!state.status.loading);
    assert_eq!(backend.calls(Call::Sheet(GASOLINE)), 0);
    Ok(())
}

#[tokio::test]
async fn next_load_clears_previous_error() -> anyhow::Result<()> {
    let backend = station();
    backend.fail(Call::Sheet(GASOLINE));
    let loader = loader_on_day(&backend, Some(GASOLINE));
    loader.mount().await;
    assert!(loader.state().status.error.is_some());

    loader.update_filters(FiltersUpdate::product(DIESEL)).await;

    assert_eq!(loader.state().status.error, None);
    Ok(())
}

#[tokio::test]
async fn product_failure_shows_products_message() -> anyhow::Result<()> {
    let backend = station();
    backend.fail(Call::Products);
    let loader = SheetLoader::new(backend.clone());

    loader.mount().await;

    let state = loader.state();
    assert!(state.products.is_empty());
    assert_eq!(state.status.error.as_deref(), Some(PRODUCTS_LOAD_FAILED));
    Ok(())
}

#[tokio::test]
async fn refresh_refetches_tanks_and_nozzles() -> anyhow::Result<()> {
    let backend = station();
    let loader = loader_on_day(&backend, Some(GASOLINE));
    loader.mount().await;

    backend.set_tanks(
        GASOLINE,
        vec![
            tank_fixture(Some(1), "T1", GASOLINE),
            tank_fixture(Some(2), "T2", GASOLINE),
        ],
    );
    backend.set_nozzles(TankId(2), vec![nozzle_fixture(20, "B4")]);
    loader.refresh_sheet().await;

    let state = loader.state();
    assert_eq!(state.tanks.len(), 2);
    assert_eq!(state.nozzles.len(), 3);
    assert_eq!(backend.calls(Call::Tanks(GASOLINE)), 2);
    assert_eq!(
        loader.resolver().cached(GASOLINE).map(|p| p.tanks.len()),
        Some(2)
    );
    Ok(())
}

#[tokio::test]
async fn returning_to_a_product_uses_the_cache() -> anyhow::Result<()> {
    let backend = station();
    let loader = loader_on_day(&backend, Some(GASOLINE));
    loader.mount().await;

    loader.update_filters(FiltersUpdate::product(DIESEL)).await;
    loader.update_filters(FiltersUpdate::product(GASOLINE)).await;

    assert_eq!(backend.calls(Call::Tanks(GASOLINE)), 1);
    assert_eq!(backend.calls(Call::Sheet(GASOLINE)), 2);
    assert_eq!(loader.state().nozzles.len(), 2);
    Ok(())
}

#[tokio::test]
async fn date_change_reloads_the_sheet() -> anyhow::Result<()> {
    let backend = station();
    let next_day = day().tomorrow()?;
    backend.set_sheet(sheet_fixture(101, next_day, GASOLINE));
    let loader = loader_on_day(&backend, Some(GASOLINE));
    loader.mount().await;
    assert!(loader.state().sheet.is_none());

    loader.update_filters(FiltersUpdate::date(next_day)).await;

    let state = loader.state();
    assert_eq!(state.sheet.map(|s| s.id), Some(SheetId(101)));
    assert_eq!(backend.calls(Call::Tanks(GASOLINE)), 1);
    Ok(())
}

#[tokio::test]
async fn loaders_do_not_share_a_cache() -> anyhow::Result<()> {
    let backend = station();
    let first = loader_on_day(&backend, Some(GASOLINE));
    first.mount().await;
    drop(first);

    let second = loader_on_day(&backend, Some(GASOLINE));
    second.mount().await;

    assert_eq!(backend.calls(Call::Tanks(GASOLINE)), 2);
    Ok(())
}
