use std::sync::Arc;

use rowmap::{FieldDescriptor, RecordMapper, SqliteExecutor, TableRecord, Value};
use tempfile::NamedTempFile;

#[derive(Debug, Clone, Default, PartialEq)]
struct Company {
    id: i64,
    hold: i64,
    name: String,
    code: String,
}

impl Company {
    fn new(id: i64, hold: i64, name: &str, code: &str) -> Self {
        Self {
            id,
            hold,
            name: name.to_string(),
            code: code.to_string(),
        }
    }
}

impl TableRecord for Company {
    fn table_name() -> &'static str {
        "companies"
    }

    fn scope_column() -> &'static str {
        "hold"
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn fields() -> &'static [FieldDescriptor<Self>] {
        const FIELDS: &[FieldDescriptor<Company>] = &[
            FieldDescriptor {
                name: "id",
                get: |c| Value::Integer(c.id),
                set: |c, v| {
                    c.id = v.try_into()?;
                    Ok(())
                },
            },
            FieldDescriptor {
                name: "hold",
                get: |c| Value::Integer(c.hold),
                set: |c, v| {
                    c.hold = v.try_into()?;
                    Ok(())
                },
            },
            FieldDescriptor {
                name: "name",
                get: |c| Value::Text(c.name.clone()),
                set: |c, v| {
                    c.name = v.try_into()?;
                    Ok(())
                },
            },
            FieldDescriptor {
                name: "code",
                get: |c| Value::Text(c.code.clone()),
                set: |c, v| {
                    c.code = v.try_into()?;
                    Ok(())
                },
            },
        ];
        FIELDS
    }
}

const SCHEMA: &str = r#"
    CREATE TABLE companies (
        id INTEGER PRIMARY KEY,
        hold INTEGER NOT NULL,
        name TEXT NOT NULL,
        code TEXT NOT NULL
    );
"#;

fn mapper() -> RecordMapper<Company, SqliteExecutor> {
    let executor = SqliteExecutor::open_in_memory().unwrap();
    executor.run_batch(SCHEMA).unwrap();
    RecordMapper::new(Arc::new(executor))
}

#[tokio::test]
async fn insert_then_get_by_id_round_trips() {
    let mapper = mapper();
    let acme = Company::new(1, 0, "Acme", "A1");

    mapper.insert(&acme).await.unwrap();
    let found = mapper.get_by_id(1, 0i64).await.unwrap();
    assert_eq!(found, Some(acme));
}

#[tokio::test]
async fn get_by_id_requires_matching_scope() {
    let mapper = mapper();
    mapper.insert(&Company::new(1, 7, "Acme", "A1")).await.unwrap();

    assert!(mapper.get_by_id(1, 7i64).await.unwrap().is_some());
    assert_eq!(mapper.get_by_id(1, 0i64).await.unwrap(), None);
}

#[tokio::test]
async fn get_by_id_absent_returns_none() {
    let mapper = mapper();
    assert_eq!(mapper.get_by_id(99, 0i64).await.unwrap(), None);
}

#[tokio::test]
async fn update_applies_changes_and_keeps_id() {
    let mapper = mapper();
    mapper.insert(&Company::new(1, 0, "Acme", "A1")).await.unwrap();

    let renamed = Company::new(1, 0, "Acme Inc", "A1");
    mapper.update(&renamed).await.unwrap();

    let found = mapper.get_by_id(1, 0i64).await.unwrap().unwrap();
    assert_eq!(found, renamed);
    assert_eq!(mapper.get_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn save_inserts_fresh_and_updates_existing() {
    let mapper = mapper();

    mapper.save(&Company::new(1, 0, "Acme", "A1")).await.unwrap();
    assert_eq!(mapper.get_all().await.unwrap().len(), 1);

    mapper.save(&Company::new(1, 0, "Acme Inc", "A2")).await.unwrap();
    let all = mapper.get_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0], Company::new(1, 0, "Acme Inc", "A2"));
}

#[tokio::test]
async fn delete_removes_one_row_and_tolerates_missing_ids() {
    let mapper = mapper();
    mapper.insert(&Company::new(1, 0, "Acme", "A1")).await.unwrap();
    mapper.insert(&Company::new(2, 0, "Globex", "G2")).await.unwrap();

    mapper.delete(1).await.unwrap();
    let all = mapper.get_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, 2);

    // Absent id: a no-op, not an error.
    mapper.delete(99).await.unwrap();
    assert_eq!(mapper.get_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn delete_many_removes_every_given_record() {
    let mapper = mapper();
    let records = vec![
        Company::new(1, 0, "Acme", "A1"),
        Company::new(2, 0, "Globex", "G2"),
        Company::new(3, 0, "Initech", "I3"),
    ];
    for record in &records {
        mapper.insert(record).await.unwrap();
    }

    mapper.delete_many(&records[..2]).await.unwrap();
    let all = mapper.get_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, 3);
}

#[tokio::test]
async fn get_all_returns_stored_set() {
    let mapper = mapper();
    let records = vec![
        Company::new(1, 0, "Acme", "A1"),
        Company::new(2, 0, "Globex", "G2"),
        Company::new(3, 1, "Initech", "I3"),
    ];
    for record in &records {
        mapper.insert(record).await.unwrap();
    }

    let mut all = mapper.get_all().await.unwrap();
    all.sort_by_key(|c| c.id);
    assert_eq!(all, records);
}

#[tokio::test]
async fn full_lifecycle_scenario() {
    let mapper = mapper();
    let acme = Company::new(1, 0, "Acme", "A1");

    mapper.insert(&acme).await.unwrap();
    assert_eq!(mapper.get_by_id(1, 0i64).await.unwrap(), Some(acme.clone()));

    let renamed = Company::new(1, 0, "Acme Inc", "A1");
    mapper.update(&renamed).await.unwrap();
    assert_eq!(mapper.get_by_id(1, 0i64).await.unwrap(), Some(renamed));

    mapper.delete(1).await.unwrap();
    assert!(mapper.get_all().await.unwrap().is_empty());
    assert_eq!(mapper.get_by_id(1, 0i64).await.unwrap(), None);
}

#[tokio::test]
async fn executor_failures_propagate() {
    // No schema: every statement hits a missing table.
    let executor = SqliteExecutor::open_in_memory().unwrap();
    let mapper: RecordMapper<Company, SqliteExecutor> = RecordMapper::new(Arc::new(executor));

    assert!(mapper.insert(&Company::new(1, 0, "Acme", "A1")).await.is_err());
    assert!(mapper.get_all().await.is_err());
}

#[tokio::test]
async fn file_backed_store_persists_across_reopen() {
    let temp_file = NamedTempFile::new().unwrap();
    let path = temp_file.path().to_path_buf();

    {
        let executor = SqliteExecutor::open(&path).unwrap();
        executor.run_batch(SCHEMA).unwrap();
        let mapper: RecordMapper<Company, SqliteExecutor> = RecordMapper::new(Arc::new(executor));
        mapper.insert(&Company::new(1, 0, "Acme", "A1")).await.unwrap();
    }

    let executor = SqliteExecutor::open(&path).unwrap();
    let mapper: RecordMapper<Company, SqliteExecutor> = RecordMapper::new(Arc::new(executor));
    let all = mapper.get_all().await.unwrap();
    assert_eq!(all, vec![Company::new(1, 0, "Acme", "A1")]);
}
