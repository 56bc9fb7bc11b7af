use asyncbind_core::CancellationToken;
use asyncbind_stream::BindAsyncExt;
use asyncbind_test_utils::{assert_no_element_emitted, increase, increase_then_fail, TestError};
use futures::StreamExt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::unbounded_channel;
use tokio::time::{sleep, timeout};
use tokio_stream::wrappers::UnboundedReceiverStream;

#[tokio::test]
async fn test_bind_async_emits_transformed_value() {
    // Arrange
    let (sender, receiver) = unbounded_channel();
    let mut stream = Box::pin(UnboundedReceiverStream::new(receiver).bind_async(
        |value: i32, _token| async move {
            let two = increase(value).await?;
            let three = increase(two).await?;
            Ok::<_, TestError>(Some(three))
        },
    ));

    // Act
    sender.send(1).unwrap();
    let item = timeout(Duration::from_secs(1), stream.next())
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert_eq!(item, Ok(3));

    // The outer stream stays open while the upstream does.
    assert_no_element_emitted(&mut stream, 50).await;
    drop(sender);
    let end = timeout(Duration::from_secs(1), stream.next()).await.unwrap();
    assert_eq!(end, None);
}

#[tokio::test]
async fn test_bind_async_emits_declared_failure_as_item() {
    // Arrange
    let (sender, receiver) = unbounded_channel();
    let mut stream = Box::pin(UnboundedReceiverStream::new(receiver).bind_async(
        |value: i32, _token| async move {
            let two = increase(value).await?;
            let three = increase_then_fail(two).await?;
            Ok(Some(three))
        },
    ));

    // Act
    sender.send(1).unwrap();
    let item = timeout(Duration::from_secs(1), stream.next())
        .await
        .unwrap()
        .unwrap();

    // Assert: the failure is an item, not the end of the stream.
    assert_eq!(item, Err(TestError::new("failed to increase 2")));
    sender.send(1).unwrap();
    let item = timeout(Duration::from_secs(1), stream.next())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(item, Err(TestError::new("failed to increase 2")));
}

#[tokio::test]
async fn test_bind_async_skips_empty_results() {
    // Arrange: odd values are filtered out by the computation.
    let (sender, receiver) = unbounded_channel();
    sender.send(1).unwrap();
    sender.send(2).unwrap();
    sender.send(3).unwrap();
    drop(sender);

    // Act
    let results: Vec<Result<i32, TestError>> = UnboundedReceiverStream::new(receiver)
        .bind_async_with_limit(1, |value: i32, _token| async move {
            sleep(Duration::from_millis(1)).await;
            Ok(if value % 2 == 0 { Some(value * 10) } else { None })
        })
        .collect()
        .await;

    // Assert
    assert_eq!(results, vec![Ok(20)]);
}

#[tokio::test]
async fn test_bind_async_with_limit_one_preserves_order() {
    // Arrange: earlier values take longer, so any overlap would reorder.
    let (sender, receiver) = unbounded_channel();
    sender.send(1).unwrap();
    sender.send(2).unwrap();
    sender.send(3).unwrap();
    drop(sender);

    // Act
    let results: Vec<Result<i32, TestError>> = UnboundedReceiverStream::new(receiver)
        .bind_async_with_limit(1, |value: i32, _token| async move {
            sleep(Duration::from_millis(40 - 10 * value as u64)).await;
            Ok(Some(value * 2))
        })
        .collect()
        .await;

    // Assert
    assert_eq!(results, vec![Ok(2), Ok(4), Ok(6)]);
}

#[tokio::test]
async fn test_bind_async_runs_values_concurrently() {
    // Arrange: the first value is slow, the second fast.
    let (sender, receiver) = unbounded_channel();
    sender.send(1).unwrap();
    sender.send(2).unwrap();
    drop(sender);

    // Act
    let results: Vec<Result<i32, TestError>> = UnboundedReceiverStream::new(receiver)
        .bind_async(|value: i32, _token| async move {
            if value == 1 {
                sleep(Duration::from_millis(100)).await;
            } else {
                sleep(Duration::from_millis(10)).await;
            }
            Ok(Some(value))
        })
        .collect()
        .await;

    // Assert: the fast value overtook the slow one.
    assert_eq!(results, vec![Ok(2), Ok(1)]);
}

#[tokio::test]
async fn test_dropping_output_cancels_in_flight_computation() {
    // Arrange
    let cancelled = Arc::new(AtomicBool::new(false));
    let completed = Arc::new(AtomicBool::new(false));
    let (sender, receiver) = unbounded_channel();
    let mut stream = Box::pin(UnboundedReceiverStream::new(receiver).bind_async({
        let cancelled = cancelled.clone();
        let completed = completed.clone();
        move |value: i32, token: CancellationToken| {
            let cancelled = cancelled.clone();
            let completed = completed.clone();
            async move {
                tokio::select! {
                    () = token.cancelled() => {
                        cancelled.store(true, Ordering::SeqCst);
                        Ok::<Option<i32>, TestError>(None)
                    }
                    () = sleep(Duration::from_millis(500)) => {
                        completed.store(true, Ordering::SeqCst);
                        Ok(Some(value))
                    }
                }
            }
        }
    }));

    // Act: poll long enough for the computation to launch, then abandon the
    // pipeline.
    sender.send(1).unwrap();
    assert_no_element_emitted(&mut stream, 50).await;
    drop(stream);
    sleep(Duration::from_millis(50)).await;

    // Assert
    assert!(cancelled.load(Ordering::SeqCst));
    assert!(!completed.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_bind_async_ends_when_upstream_ends() {
    // Arrange
    let (sender, receiver) = unbounded_channel();
    let stream = UnboundedReceiverStream::new(receiver).bind_async(
        |value: i32, _token| async move { Ok::<_, TestError>(Some(value)) },
    );

    // Act
    sender.send(7).unwrap();
    drop(sender);
    let results: Vec<Result<i32, TestError>> =
        timeout(Duration::from_secs(1), stream.collect()).await.unwrap();

    // Assert
    assert_eq!(results, vec![Ok(7)]);
}
