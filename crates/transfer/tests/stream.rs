use std::{
    cell::{Cell, RefCell},
    time::Duration,
};

use futures_util::{StreamExt, stream};
use tokio::{
    sync::{mpsc, oneshot},
    time::sleep,
};
use transfer::{Transfer, TransferStatus, TransferStreamExt, poll_every};

fn mixed() -> impl futures_util::Stream<Item = Transfer<i32>> {
    stream::iter(vec![
        Transfer::success(1),
        Transfer::network_error("offline"),
        Transfer::success(3),
    ])
}

#[tokio::test]
async fn transform_applies_to_each_element() {
    let statuses: Vec<_> = mixed()
        .transform(|v| v * 10)
        .map(|transfer| (transfer.status(), transfer.into_data()))
        .collect()
        .await;
    assert_eq!(
        statuses,
        vec![
            (TransferStatus::Success, Some(10)),
            (TransferStatus::NetworkError, None),
            (TransferStatus::Success, Some(30)),
        ]
    );
}

#[tokio::test]
async fn flat_transform_async_may_fail_per_element() {
    let results: Vec<_> = stream::iter(vec![Transfer::success(2), Transfer::success(0)])
        .flat_transform_async(|v| async move {
            if v == 0 {
                Transfer::user_error("zero")
            } else {
                Transfer::success(10 / v)
            }
        })
        .collect()
        .await;
    assert_eq!(results[0], Transfer::success(5));
    assert_eq!(results[1].status(), TransferStatus::UserError);
}

#[tokio::test]
async fn successes_drops_failures() {
    let values: Vec<_> = mixed()
        .successes()
        .filter_map(|transfer| async move { transfer.into_data() })
        .collect()
        .await;
    assert_eq!(values, vec![1, 3]);
}

#[tokio::test]
async fn unfold_calls_one_callback_per_element() {
    let values = RefCell::new(Vec::new());
    let failures = Cell::new(0);

    mixed()
        .unfold(
            |v| values.borrow_mut().push(v),
            |_| failures.set(failures.get() + 1),
        )
        .await;

    assert_eq!(*values.borrow(), vec![1, 3]);
    assert_eq!(failures.get(), 1);
}

#[tokio::test]
async fn panic_while_polling_is_reported_once_and_ends_the_drain() {
    let failures = Cell::new(0);
    let values = Cell::new(0);
    let source = stream::iter(0..3).map(|v| {
        if v == 1 {
            panic!("source broke");
        }
        Transfer::success(v)
    });

    source
        .unfold(
            |_| values.set(values.get() + 1),
            |_| failures.set(failures.get() + 1),
        )
        .await;

    assert_eq!(values.get(), 1);
    assert_eq!(failures.get(), 1);
}

#[tokio::test(start_paused = true)]
async fn shutdown_stops_silently() {
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let failures = Cell::new(0);
    let values = Cell::new(0);

    let polling = poll_every(Duration::from_secs(1), || async { Transfer::success(()) });
    let stopper = async move {
        sleep(Duration::from_millis(2500)).await;
        let _ = stop_tx.send(());
    };

    tokio::join!(
        polling.unfold_until(
            async move {
                let _ = stop_rx.await;
            },
            |()| values.set(values.get() + 1),
            |_| failures.set(failures.get() + 1),
        ),
        stopper,
    );

    assert_eq!(values.get(), 3);
    assert_eq!(failures.get(), 0);
}

#[tokio::test(start_paused = true)]
async fn poll_every_first_poll_is_immediate() {
    let calls = Cell::new(0);
    let start = tokio::time::Instant::now();
    let first = poll_every(Duration::from_secs(60), || {
        calls.set(calls.get() + 1);
        let call = calls.get();
        async move { Transfer::success(call) }
    })
    .boxed_local()
    .next()
    .await;

    assert_eq!(first.and_then(Transfer::into_data), Some(1));
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn combine_latest_waits_for_both_sides() {
    let (left_tx, left_rx) = mpsc::unbounded_channel();
    let (right_tx, right_rx) = mpsc::unbounded_channel();
    let left = stream::unfold(left_rx, |mut rx| async move {
        rx.recv().await.map(|item| (item, rx))
    });
    let right = stream::unfold(right_rx, |mut rx| async move {
        rx.recv().await.map(|item| (item, rx))
    });

    left_tx.send(Transfer::success(1)).unwrap();
    left_tx.send(Transfer::success(2)).unwrap();
    drop(left_tx);
    right_tx.send(Transfer::success(10)).unwrap();
    drop(right_tx);

    let combined: Vec<_> = left
        .combine_latest(right, |a: i32, b: i32| a + b)
        .filter_map(|transfer| async move { transfer.into_data() })
        .collect()
        .await;

    assert!(!combined.is_empty());
    assert_eq!(combined.last(), Some(&12));
}

#[tokio::test]
async fn combine_latest_reports_failure_of_either_side() {
    let left = stream::iter(vec![Transfer::<i32>::success(1)]);
    let right = stream::iter(vec![Transfer::<i32>::not_found("missing")]);

    let combined: Vec<_> = left.combine_latest(right, |a, b| a + b).collect().await;

    assert_eq!(combined.len(), 1);
    assert_eq!(combined[0].status(), TransferStatus::NotFound);
}
