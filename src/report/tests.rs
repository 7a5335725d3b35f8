use serde_json::json;
use tempfile::TempDir;

use super::*;

fn report(exam: &str, student: &str) -> GradeReport {
    GradeReport::new(exam, json!({ "1": { "total_score": 8.0 } }))
        .with_student(Some(student.to_string()), Some("R-17".to_string()))
        .with_profile("equal_mean_scaled")
}

#[test]
fn test_validate_exam_id() {
    assert!(validate_exam_id("biology-midterm").is_ok());
    assert!(validate_exam_id("Physics 2024").is_ok());

    for bad in ["", "   ", "..", ".hidden", "a/b", "a\\b", "tab\tname"] {
        assert!(
            matches!(validate_exam_id(bad), Err(PersistenceError::InvalidExamId { .. })),
            "{bad:?} should be rejected"
        );
    }
    assert!(validate_exam_id(&"x".repeat(MAX_EXAM_ID_LEN + 1)).is_err());
}

#[test]
fn test_report_serde_shape() {
    let value = serde_json::to_value(report("chem", "Ada")).unwrap();
    assert_eq!(value["exam_id"], "chem");
    assert_eq!(value["student_name"], "Ada");
    assert_eq!(value["roll_number"], "R-17");
    assert_eq!(value["profile"], "equal_mean_scaled");
    assert_eq!(value["verdicts"]["1"]["total_score"], 8.0);
    assert!(value["created_at"].is_string());
}

mod file_store_tests {
    use super::*;

    #[tokio::test]
    async fn test_save_and_list_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileReportStore::new(dir.path());

        let first = report("chem", "Ada");
        let second = report("chem", "Grace");
        store.save(&first).await.unwrap();
        store.save(&second).await.unwrap();

        let reports = store.list_reports("chem").await.unwrap();
        assert_eq!(reports, vec![first, second]);
        assert!(dir.path().join("chem").join(REPORTS_FILE).is_file());
    }

    #[tokio::test]
    async fn test_list_exams_sorted() {
        let dir = TempDir::new().unwrap();
        let store = FileReportStore::new(dir.path());

        store.save(&report("zoology", "A")).await.unwrap();
        store.save(&report("algebra", "B")).await.unwrap();
        std::fs::create_dir(dir.path().join("empty-dir")).unwrap();

        assert_eq!(store.list_exams().await.unwrap(), vec!["algebra", "zoology"]);
    }

    #[tokio::test]
    async fn test_missing_root_lists_nothing() {
        let dir = TempDir::new().unwrap();
        let store = FileReportStore::new(dir.path().join("not-created"));

        assert!(store.list_exams().await.unwrap().is_empty());
        assert!(store.list_reports("anything").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejects_traversal() {
        let dir = TempDir::new().unwrap();
        let store = FileReportStore::new(dir.path());

        let err = store.save(&report("../escape", "Eve")).await.unwrap_err();
        assert!(matches!(err, PersistenceError::InvalidExamId { .. }));
        assert!(store.list_reports("..").await.is_err());
    }

    #[tokio::test]
    async fn test_corrupt_line_reported() {
        let dir = TempDir::new().unwrap();
        let store = FileReportStore::new(dir.path());
        store.save(&report("bio", "Ada")).await.unwrap();

        let path = dir.path().join("bio").join(REPORTS_FILE);
        let mut contents = std::fs::read_to_string(&path).unwrap();
        contents.push_str("{not json\n");
        std::fs::write(&path, contents).unwrap();

        match store.list_reports("bio").await.unwrap_err() {
            PersistenceError::Corrupt { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_concurrent_saves_do_not_interleave() {
        let dir = TempDir::new().unwrap();
        let store = std::sync::Arc::new(FileReportStore::new(dir.path()));

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = std::sync::Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.save(&report("exam", &format!("student-{i}"))).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.list_reports("exam").await.unwrap().len(), 16);
    }
}

mod mock_store_tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_store_records_reports() {
        let store = MockReportStore::new();
        assert!(store.is_empty());

        store.save(&report("b", "x")).await.unwrap();
        store.save(&report("a", "y")).await.unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.list_exams().await.unwrap(), vec!["a", "b"]);
        assert_eq!(store.list_reports("a").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_mock_store_failure_switch() {
        let store = MockReportStore::new();
        store.set_fail_saves(true);

        let err = store.save(&report("a", "x")).await.unwrap_err();
        assert!(matches!(err, PersistenceError::Unavailable { .. }));
        assert!(store.is_empty());
    }
}
