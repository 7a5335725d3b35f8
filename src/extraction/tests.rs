use std::path::Path;

use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use super::*;
use crate::comparator::PageIndex;

fn write_page(dir: &Path, name: &str, text: &str) {
    std::fs::write(dir.join(name), text).unwrap();
}

fn page(index: usize, name: &str, text: &str) -> PageImage {
    PageImage {
        index: PageIndex::new(index).unwrap(),
        name: name.to_string(),
        media_type: "image/png",
        bytes: text.as_bytes().to_vec(),
    }
}

async fn read_all(source: &dyn PageSource) -> Vec<PageImage> {
    source
        .pages()
        .await
        .unwrap()
        .into_iter()
        .map(Result::unwrap)
        .collect()
}

/// Serves one HTTP request with `status` and `body`, returning the request bytes.
async fn serve_once(status: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            request.extend_from_slice(&buf[..n]);
            if n == 0 || request_complete(&request) {
                break;
            }
        }

        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        request
    });

    (format!("http://{addr}/recognize"), handle)
}

fn request_complete(request: &[u8]) -> bool {
    let text = String::from_utf8_lossy(request);
    let Some(header_end) = text.find("\r\n\r\n") else {
        return false;
    };
    let content_length = text[..header_end]
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);
    request.len() >= header_end + 4 + content_length
}

mod source_tests {
    use super::*;

    #[tokio::test]
    async fn test_directory_pages_sorted_by_name() {
        let dir = TempDir::new().unwrap();
        write_page(dir.path(), "page_02.png", "second");
        write_page(dir.path(), "page_01.jpg", "first");
        write_page(dir.path(), "page_03.JPEG", "third");
        write_page(dir.path(), "notes.txt", "ignored");

        let pages = read_all(&ImageDirectorySource::new(dir.path())).await;

        let names: Vec<&str> = pages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["page_01.jpg", "page_02.png", "page_03.JPEG"]);
        assert_eq!(pages[0].index, PageIndex::FIRST);
        assert_eq!(pages[0].media_type, "image/jpeg");
        assert_eq!(pages[1].media_type, "image/png");
        assert_eq!(pages[2].index.get(), 3);
        assert_eq!(pages[1].bytes, b"second");
    }

    #[tokio::test]
    async fn test_missing_directory_is_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");

        let err = ImageDirectorySource::new(&missing).pages().await.unwrap_err();
        assert!(matches!(err, ExtractionError::SourceUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_empty_directory_has_no_pages() {
        let dir = TempDir::new().unwrap();
        let pages = ImageDirectorySource::new(dir.path()).pages().await.unwrap();
        assert!(pages.is_empty());
    }

    #[tokio::test]
    async fn test_directory_pages_in_natural_order() {
        let dir = TempDir::new().unwrap();
        for n in [10, 2, 1, 11, 3] {
            write_page(dir.path(), &format!("page{n}.png"), &format!("p{n}"));
        }

        let pages = read_all(&ImageDirectorySource::new(dir.path())).await;

        let names: Vec<&str> = pages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["page1.png", "page2.png", "page3.png", "page10.png", "page11.png"]
        );
        assert_eq!(pages[3].index.get(), 4);
        assert_eq!(pages[3].bytes, b"p10");
    }

    #[test]
    fn test_natural_cmp() {
        use std::cmp::Ordering;

        use crate::extraction::source::natural_cmp;

        assert_eq!(natural_cmp("page2.png", "page10.png"), Ordering::Less);
        assert_eq!(natural_cmp("page_02.png", "page_10.png"), Ordering::Less);
        assert_eq!(natural_cmp("scan9", "scan09"), Ordering::Less);
        assert_eq!(natural_cmp("a.png", "B.png"), Ordering::Less);
        assert_eq!(natural_cmp("x1y2", "x1y2"), Ordering::Equal);
        assert_eq!(natural_cmp("p", "p1"), Ordering::Less);
    }

    #[tokio::test]
    async fn test_unreadable_page_keeps_its_slot() {
        let dir = TempDir::new().unwrap();
        write_page(dir.path(), "p1.png", "first");
        std::fs::create_dir(dir.path().join("p2.png")).unwrap();
        write_page(dir.path(), "p3.png", "third");

        let entries = ImageDirectorySource::new(dir.path()).pages().await.unwrap();

        assert_eq!(entries.len(), 3);
        assert!(matches!(&entries[1], Err(ExtractionError::ReadFailed { path, .. }) if path.ends_with("p2.png")));
        assert_eq!(entries[2].as_ref().unwrap().index.get(), 3);
    }

    #[tokio::test]
    async fn test_memory_source_keeps_push_order() {
        let mut source = MemoryPageSource::new();
        source.push("scan-b.png", "image/png", b"second".to_vec());
        source.push("scan-a.jpg", "image/jpeg", b"first".to_vec());
        assert_eq!(source.len(), 2);

        let pages = read_all(&source).await;
        assert_eq!(pages[0].name, "scan-b.png");
        assert_eq!(pages[0].index, PageIndex::FIRST);
        assert_eq!(pages[1].index.get(), 2);
    }

    #[test]
    fn test_page_media_type() {
        assert_eq!(page_media_type("p.bin", Some("image/png")), Some("image/png"));
        assert_eq!(page_media_type("p.PNG", None), Some("image/png"));
        assert_eq!(page_media_type("p.jpg", Some("application/octet-stream")), Some("image/jpeg"));
        assert_eq!(page_media_type("scan.pdf", Some("application/pdf")), None);
        assert_eq!(page_media_type("notes", None), None);
    }

    #[test]
    fn test_page_image_debug_hides_bytes() {
        let debug = format!("{:?}", page(1, "p.png", "secret answer"));
        assert!(!debug.contains("secret"));
        assert!(debug.contains("p.png"));
    }
}

mod extract_tests {
    use super::*;

    #[tokio::test]
    async fn test_extract_pages_in_order() {
        let dir = TempDir::new().unwrap();
        write_page(dir.path(), "1.png", "  Photosynthesis needs light \n");
        write_page(dir.path(), "2.png", "Chlorophyll is green");

        let recognizer = MockRecognizer::new();
        let set = extract_pages(&ImageDirectorySource::new(dir.path()), &recognizer)
            .await
            .unwrap();

        assert_eq!(set.pages(), &["Photosynthesis needs light", "Chlorophyll is green"]);
        assert_eq!(recognizer.calls(), 2);
    }

    #[tokio::test]
    async fn test_failed_page_becomes_empty_text() {
        let dir = TempDir::new().unwrap();
        write_page(dir.path(), "a.png", "first");
        write_page(dir.path(), "b.png", "second");
        write_page(dir.path(), "c.png", "third");

        let recognizer = MockRecognizer::new().fail_on("b.png");
        let set = extract_pages(&ImageDirectorySource::new(dir.path()), &recognizer)
            .await
            .unwrap();

        assert_eq!(set.len(), 3);
        assert_eq!(set.pages(), &["first", "", "third"]);
        assert_eq!(recognizer.calls(), 3);
    }

    #[tokio::test]
    async fn test_unreadable_page_becomes_empty_text() {
        let dir = TempDir::new().unwrap();
        write_page(dir.path(), "p1.png", "first");
        std::fs::create_dir(dir.path().join("p2.png")).unwrap();
        write_page(dir.path(), "p3.png", "third");

        let recognizer = MockRecognizer::new();
        let set = extract_pages(&ImageDirectorySource::new(dir.path()), &recognizer)
            .await
            .unwrap();

        assert_eq!(set.pages(), &["first", "", "third"]);
        assert_eq!(recognizer.calls(), 2);
    }

    #[tokio::test]
    async fn test_unreadable_source_aborts() {
        let dir = TempDir::new().unwrap();
        let result = extract_pages(
            &ImageDirectorySource::new(dir.path().join("missing")),
            &MockRecognizer::new(),
        )
        .await;
        assert!(result.is_err());
    }
}

mod http_tests {
    use super::*;

    #[test]
    fn test_invalid_endpoint_rejected() {
        let err = HttpRecognizer::new("not a url").unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidEndpoint { .. }));
    }

    #[tokio::test]
    async fn test_http_recognizer_posts_bytes_and_trims() {
        let (url, server) = serve_once("200 OK", r#"{"text": "  Newton's first law \n"}"#).await;
        let recognizer = HttpRecognizer::new(&url).unwrap();

        let text = recognizer
            .recognize(&page(1, "p1.png", "IMAGEBYTES"))
            .await
            .unwrap();
        assert_eq!(text, "Newton's first law");

        let request = String::from_utf8(server.await.unwrap()).unwrap();
        assert!(request.starts_with("POST /recognize"));
        assert!(request.to_ascii_lowercase().contains("content-type: image/png"));
        assert!(request.ends_with("IMAGEBYTES"));
    }

    #[tokio::test]
    async fn test_http_recognizer_error_status() {
        let (url, server) = serve_once("503 Service Unavailable", r#"{"error": "busy"}"#).await;
        let recognizer = HttpRecognizer::new(&url).unwrap();

        let err = recognizer.recognize(&page(4, "p4.png", "x")).await.unwrap_err();
        match err {
            ExtractionError::RecognitionFailed { page, reason } => {
                assert_eq!(page, 4);
                assert!(reason.contains("503"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_http_recognizer_malformed_body() {
        let (url, server) = serve_once("200 OK", r#"{"unexpected": true}"#).await;
        let recognizer = HttpRecognizer::new(&url).unwrap();

        let err = recognizer.recognize(&page(1, "p.png", "x")).await.unwrap_err();
        assert!(err.to_string().contains("malformed response"));
        server.await.unwrap();
    }
}
