use record_store::{
    DefaultBackend, PersistPolicy, Record, RecordStore, RecordStoreBuilder, StoreConfig,
    StoreHandle,
};
use std::thread;

fn main() -> Result<(), record_store::Error> {
    tracing_subscriber::fmt().with_target(false).compact().init();

    let path = std::env::temp_dir().join("record_store_example_builder.json");
    let _ = std::fs::remove_file(&path);

    let config = StoreConfig::from_toml_str(&format!(
        "path = {:?}\nstrict_persistence = true\n",
        path.display().to_string()
    ))?;

    let store = RecordStoreBuilder::<DefaultBackend>::from_config(&config)
        .seed(vec![Record::new(1, "Welcome", "The only seeded article")])
        .build()?;
    assert_eq!(store.policy(), PersistPolicy::Strict);

    // share one store between "handlers"
    let handle = StoreHandle::new(store);
    let workers: Vec<_> = (0..4)
        .map(|n| {
            let handle = handle.clone();
            thread::spawn(move || handle.create(format!("worker {n}"), "hello").map(|r| r.id))
        })
        .collect();
    for worker in workers {
        match worker.join() {
            Ok(result) => println!("created id {}", result?),
            Err(_) => eprintln!("worker panicked"),
        }
    }

    println!("{} records on disk at {}", handle.len(), handle.path().display());
    let reopened = RecordStore::open(&path)?;
    println!("reopened sees {} records", reopened.len());

    let _ = std::fs::remove_file(&path);
    Ok(())
}
