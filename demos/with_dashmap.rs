use dashmap::DashMap;
use record_store::{Record, RecordId, RecordStoreBuilder};

fn main() -> Result<(), record_store::Error> {
    let path = std::env::temp_dir().join("record_store_example_dashmap.json");
    let _ = std::fs::remove_file(&path);

    let store = RecordStoreBuilder::<DashMap<RecordId, Record>>::new(&path)
        .pretty(false)
        .build()?;
    let record = store.create("dashmap", "backed")?;
    println!("{record:?}");
    println!("{} records", store.len());

    let _ = std::fs::remove_file(&path);
    Ok(())
}
