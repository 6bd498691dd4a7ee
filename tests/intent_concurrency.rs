//! The listener and tick contexts hammering one shared intent.

use gesture_link::{Command, SharedIntent};
use std::thread;

#[test]
fn test_concurrent_applies_never_tear() {
    let intent = SharedIntent::new();
    let commands = [
        Command::MoveLeft,
        Command::MoveRight,
        Command::Jump,
        Command::Stop,
    ];

    thread::scope(|scope| {
        // Listener side: cycle through every command
        let writer = intent.clone();
        scope.spawn(move || {
            for i in 0..1000 {
                writer.apply(commands[i % commands.len()]);
            }
        });

        // Tick side: alternate grounded and airborne reads
        let reader = intent.clone();
        scope.spawn(move || {
            for i in 0..1000 {
                let (observed, _) = reader.consume(i % 2 == 0);
                assert!(
                    !(observed.move_left() && observed.move_right()),
                    "torn intent observed: {:?}",
                    observed
                );
                let snapshot = reader.snapshot();
                assert!(!(snapshot.move_left() && snapshot.move_right()));
            }
        });
    });

    // 999 % 4 == 3, so the last command applied was STOP
    let last = intent.snapshot();
    assert!(!last.move_left());
    assert!(!last.move_right());
}

#[test]
fn test_jump_fires_at_most_once_per_request() {
    let intent = SharedIntent::new();
    intent.apply(Command::Jump);

    // Four tick loops race to consume one request
    let fired: usize = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let intent = intent.clone();
                scope.spawn(move || (0..100).filter(|_| intent.consume(true).1).count())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).sum()
    });

    assert_eq!(fired, 1);
}
