use super::{Band, Direction, RowPartition};
use crate::domain::*;
use crate::error::{Error, Result};
use crossbeam_channel::{bounded, Receiver, Sender};

/// One boundary row, tagged with the step it was produced for.
#[derive(Clone, Debug, PartialEq)]
pub struct HaloMessage {
    pub step: usize,
    pub row: Vec<f64>,
}

/// A worker's four channel ends. A missing end means there is no
/// neighbor in that direction and the matching ghost row is never
/// written.
#[derive(Debug)]
pub struct HaloLink {
    rank: usize,
    to_upper: Option<Sender<HaloMessage>>,
    to_lower: Option<Sender<HaloMessage>>,
    from_upper: Option<Receiver<HaloMessage>>,
    from_lower: Option<Receiver<HaloMessage>>,
}

/// Wire up every band with its neighbors. Each directed pair gets its
/// own single slot channel, so a worker can run at most one step ahead
/// of the neighbors it feeds.
pub fn halo_links(partition: &RowPartition) -> Vec<HaloLink> {
    let mut links: Vec<HaloLink> = (0..partition.workers())
        .map(|rank| HaloLink {
            rank,
            to_upper: None,
            to_lower: None,
            from_upper: None,
            from_lower: None,
        })
        .collect();

    for band in partition.bands() {
        if let Some(lower) = band.lower {
            let (tx, rx) = bounded(1);
            links[band.rank].to_lower = Some(tx);
            links[lower].from_upper = Some(rx);
        }
        if let Some(upper) = band.upper {
            let (tx, rx) = bounded(1);
            links[band.rank].to_upper = Some(tx);
            links[upper].from_lower = Some(rx);
        }
    }
    links
}

impl HaloLink {
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Send the first owned row up and the last owned row down.
    pub fn send<DomainType: DomainView<2>>(
        &self,
        band: &Band,
        domain: &DomainType,
        step: usize,
    ) -> Result<()> {
        profiling::scope!("halo::send");
        if let Some(tx) = &self.to_upper {
            let row = domain.row(band.first_row()).to_vec();
            tx.send(HaloMessage { step, row })
                .map_err(|_| self.disconnected(Direction::Upper))?;
        }
        if let Some(tx) = &self.to_lower {
            let row = domain.row(band.last_row()).to_vec();
            tx.send(HaloMessage { step, row })
                .map_err(|_| self.disconnected(Direction::Lower))?;
        }
        Ok(())
    }

    /// Block until both neighbors delivered their rows for `step` and
    /// write them into the ghost rows.
    pub fn receive<DomainType: DomainView<2>>(
        &self,
        band: &Band,
        domain: &mut DomainType,
        step: usize,
    ) -> Result<()> {
        profiling::scope!("halo::receive");
        if let Some(rx) = &self.from_upper {
            let row = self.checked_recv(rx, Direction::Upper, step)?;
            domain.row_mut(band.upper_ghost_row()).copy_from_slice(&row);
        }
        if let Some(rx) = &self.from_lower {
            let row = self.checked_recv(rx, Direction::Lower, step)?;
            domain.row_mut(band.lower_ghost_row()).copy_from_slice(&row);
        }
        Ok(())
    }

    /// Full exchange for one step. Sending first keeps every worker from
    /// waiting on a neighbor that is itself waiting.
    pub fn exchange<DomainType: DomainView<2>>(
        &self,
        band: &Band,
        domain: &mut DomainType,
        step: usize,
    ) -> Result<()> {
        self.send(band, domain, step)?;
        self.receive(band, domain, step)
    }

    fn checked_recv(
        &self,
        rx: &Receiver<HaloMessage>,
        direction: Direction,
        step: usize,
    ) -> Result<Vec<f64>> {
        let message = rx.recv().map_err(|_| self.disconnected(direction))?;
        if message.step != step {
            return Err(Error::HaloStepMismatch {
                rank: self.rank,
                expected: step,
                received: message.step,
            });
        }
        Ok(message.row)
    }

    fn disconnected(&self, direction: Direction) -> Error {
        Error::HaloDisconnected {
            rank: self.rank,
            direction,
        }
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::config::EndPolicy;
    use crate::util::*;

    fn band_domains(partition: &RowPartition) -> Vec<OwnedDomain<2>> {
        partition
            .bands()
            .iter()
            .map(|band| {
                let mut d = OwnedDomain::new(band.with_ghosts());
                let owned = band.owned();
                d.par_set_values(
                    |c| {
                        if owned.contains(&c) {
                            (c[0] * 100 + c[1]) as f64
                        } else {
                            -1.0
                        }
                    },
                    16,
                );
                d
            })
            .collect()
    }

    #[test]
    fn fixed_exchange_fills_inner_ghosts() {
        let p = RowPartition::new(8, 2, EndPolicy::Fixed).unwrap();
        let links = halo_links(&p);
        let mut domains = band_domains(&p);
        for (link, d) in links.iter().zip(&domains) {
            link.send(p.band(link.rank()), d, 0).unwrap();
        }
        for (link, d) in links.iter().zip(domains.iter_mut()) {
            link.receive(p.band(link.rank()), d, 0).unwrap();
        }
        // worker 0 sees row 4, worker 1 sees row 3
        assert_eq!(domains[0].view(&vector![4, 2]), 402.0);
        assert_eq!(domains[1].view(&vector![3, 5]), 305.0);
        // chain ends are untouched
        assert_eq!(domains[0].view(&vector![-1, 2]), -1.0);
        assert_eq!(domains[1].view(&vector![8, 2]), -1.0);
    }

    #[test]
    fn periodic_exchange_wraps_rows() {
        let p = RowPartition::new(8, 2, EndPolicy::Periodic).unwrap();
        let links = halo_links(&p);
        let mut domains = band_domains(&p);
        for (link, d) in links.iter().zip(&domains) {
            link.send(p.band(link.rank()), d, 5).unwrap();
        }
        for (link, d) in links.iter().zip(domains.iter_mut()) {
            link.receive(p.band(link.rank()), d, 5).unwrap();
        }
        assert_eq!(domains[0].view(&vector![-1, 1]), 701.0);
        assert_eq!(domains[1].view(&vector![8, 1]), 1.0);
        assert_eq!(domains[0].view(&vector![4, 1]), 401.0);
    }

    #[test]
    fn single_periodic_worker_talks_to_itself() {
        let p = RowPartition::new(4, 1, EndPolicy::Periodic).unwrap();
        let links = halo_links(&p);
        let mut domains = band_domains(&p);
        links[0].exchange(p.band(0), &mut domains[0], 0).unwrap();
        assert_eq!(domains[0].view(&vector![-1, 3]), 303.0);
        assert_eq!(domains[0].view(&vector![4, 3]), 3.0);
    }

    #[test]
    fn stale_row_is_detected() {
        let p = RowPartition::new(8, 2, EndPolicy::Fixed).unwrap();
        let links = halo_links(&p);
        let mut domains = band_domains(&p);
        links[0].send(p.band(0), &domains[0], 3).unwrap();
        let err = links[1].receive(p.band(1), &mut domains[1], 4).unwrap_err();
        assert!(matches!(
            err,
            Error::HaloStepMismatch {
                rank: 1,
                expected: 4,
                received: 3
            }
        ));
    }

    #[test]
    fn hung_up_neighbor_is_detected() {
        let p = RowPartition::new(8, 2, EndPolicy::Fixed).unwrap();
        let mut links = halo_links(&p);
        let mut domains = band_domains(&p);
        let gone = links.remove(0);
        drop(gone);
        let err = links[0].exchange(p.band(1), &mut domains[1], 0).unwrap_err();
        assert!(matches!(
            err,
            Error::HaloDisconnected {
                rank: 1,
                direction: Direction::Upper
            }
        ));
    }
}
