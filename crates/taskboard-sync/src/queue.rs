use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use taskboard_domain::ProjectId;
use tokio::sync::{Mutex as SlotMutex, OwnedMutexGuard};

type Slots = Arc<Mutex<HashMap<ProjectId, Arc<SlotMutex<()>>>>>;

/// One in-flight operation per project.
///
/// A caller holding the slot of a project computes its plan, applies it and
/// waits for the remote writes to settle; the next caller for the same project
/// only starts planning after that, against fresh state. Projects do not wait
/// for each other.
#[derive(Debug, Clone, Default)]
pub struct SingleFlight {
    slots: Slots,
}

/// Held for the duration of one operation. Dropping it frees the slot and
/// forgets the project once nobody else holds or awaits it.
#[derive(Debug)]
pub struct FlightGuard {
    held: Option<OwnedMutexGuard<()>>,
    project_id: ProjectId,
    slots: Slots,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, project_id: ProjectId) -> FlightGuard {
        // The map lock is never held across an await.
        let slot = match self.slots.lock() {
            Ok(mut slots) => slots.entry(project_id).or_default().clone(),
            Err(poisoned) => poisoned.into_inner().entry(project_id).or_default().clone(),
        };
        FlightGuard {
            held: Some(slot.lock_owned().await),
            project_id,
            slots: self.slots.clone(),
        }
    }
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        drop(self.held.take());
        let mut slots = match self.slots.lock() {
            Ok(slots) => slots,
            Err(poisoned) => poisoned.into_inner(),
        };
        // Waiters and guards each keep a clone of the slot.
        if slots
            .get(&self.project_id)
            .is_some_and(|slot| Arc::strong_count(slot) == 1)
        {
            slots.remove(&self.project_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use uuid::Uuid;

    fn tracked(flights: &SingleFlight) -> usize {
        flights.slots.lock().unwrap().len()
    }

    #[tokio::test]
    async fn test_same_project_waits() {
        let flights = SingleFlight::new();
        let project_id = Uuid::new_v4();

        let guard = flights.acquire(project_id).await;
        let blocked =
            tokio::time::timeout(Duration::from_millis(20), flights.acquire(project_id)).await;
        assert!(blocked.is_err());

        let waiting = {
            let flights = flights.clone();
            tokio::spawn(async move {
                let _guard = flights.acquire(project_id).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiting.is_finished());

        drop(guard);
        waiting.await.unwrap();
        let free =
            tokio::time::timeout(Duration::from_millis(100), flights.acquire(project_id)).await;
        assert!(free.is_ok());
    }

    #[tokio::test]
    async fn test_other_projects_do_not_wait() {
        let flights = SingleFlight::new();
        let _held = flights.acquire(Uuid::new_v4()).await;

        let acquired = tokio::time::timeout(
            Duration::from_millis(100),
            flights.acquire(Uuid::new_v4()),
        )
        .await;
        assert!(acquired.is_ok());
    }

    #[tokio::test]
    async fn test_released_slots_are_forgotten() {
        let flights = SingleFlight::new();
        for _ in 0..5 {
            let _guard = flights.acquire(Uuid::new_v4()).await;
        }
        assert_eq!(tracked(&flights), 0);

        let project_id = Uuid::new_v4();
        let guard = flights.acquire(project_id).await;
        let waiting = {
            let flights = flights.clone();
            tokio::spawn(async move {
                let _guard = flights.acquire(project_id).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        // The waiter still needs the slot after the first holder lets go.
        drop(guard);
        assert_eq!(tracked(&flights), 1);

        waiting.await.unwrap();
        assert_eq!(tracked(&flights), 0);
    }
}
