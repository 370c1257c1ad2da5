use record_store::RecordStore;

fn main() -> Result<(), record_store::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let path = std::env::temp_dir().join("record_store_example_basic.json");
    let _ = std::fs::remove_file(&path);
    let store = RecordStore::open(&path)?;

    // first run: five seeded articles, newest first
    for record in store.list() {
        println!("{:>2}  {}", record.id, record.title);
    }

    // create / update / delete
    let created = store.create("Hello", "First article of our own")?;
    println!("created  = {created:?}");
    let updated = store.update(created.id, "Hello again", "Edited body")?;
    println!("updated  = {updated:?}");
    store.delete(created.id)?;

    // deleted ids are not handed out again
    let next = store.create("Next", "Gets a fresh id")?;
    println!("next id  = {} (was {})", next.id, created.id);

    // errors are values
    println!("get(999) = {:?}", store.get(999));
    println!("blank    = {:?}", store.create("  ", "body"));

    let _ = std::fs::remove_file(&path);
    Ok(())
}
