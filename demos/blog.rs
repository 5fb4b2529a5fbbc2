//! A headless blog: page state and an in-memory history kept in sync.
//!
//! Run with `RUST_LOG=debug cargo run --example blog` to see every push,
//! echo and dispatch decision.

use page_navigator::*;

fn pump(
    sync: &mut PageSync<PageStore, MemoryHistory>,
    store: &mut PageStore,
    notifications: &Notifications,
) -> Result<(), NavigationError> {
    while let Some(path) = notifications.pop() {
        let outcome = sync.handle_navigation(store, &path)?;
        log::info!("{:<16} -> {:?}", path, outcome);
    }
    Ok(())
}

fn show(sync: &PageSync<PageStore, MemoryHistory>, store: &PageStore) {
    let page = store.state();
    println!(
        "{:<16} page={:<6} params={:?}",
        sync.backend().location(),
        page.name,
        page.params.all()
    );
}

fn main() -> Result<(), NavigationError> {
    env_logger::init();

    let mut pages = Pages::new();
    pages.page("/").name("root").register()?;
    let posts = pages.page("/posts").name("posts").register()?;
    let post = pages
        .child_page(&posts, "/:id")
        .name("post")
        .mapper(Mapper::new().integer("id"))
        .register()?;
    pages.page("/*").name("error").register()?;

    let mut store: PageStore = PageStore::new("root", PageParams::new());
    let mut sync = PageSync::new(pages, MemoryHistory::new("/"), select_page);
    let notifications = sync.connect();
    sync.sync_current_path(&mut store)?;
    show(&sync, &store);

    for id in [1, 2] {
        sync.dispatch(&mut store, post.change_event(PageParams::new().with("id", id)).into())?;
        pump(&mut sync, &mut store, &notifications)?;
        show(&sync, &store);
    }

    sync.backend_mut().back();
    pump(&mut sync, &mut store, &notifications)?;
    show(&sync, &store);

    sync.backend_mut().push("/posts/7/comments");
    pump(&mut sync, &mut store, &notifications)?;
    show(&sync, &store);

    #[cfg(feature = "cache")]
    println!("match cache hit rate: {:.0}%", sync.cache_stats().hit_rate() * 100.0);

    Ok(())
}
