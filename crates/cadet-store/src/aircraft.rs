use cadet_shared::{Aircraft, Id, NewAircraft, Validate};

use crate::error::{Result, StoreError};
use crate::store::Store;

impl Store {
    pub fn create_aircraft(&mut self, new: NewAircraft) -> Result<Aircraft> {
        new.validate()?;
        if self
            .aircraft
            .values()
            .any(|a| a.tail_number == new.tail_number)
        {
            return Err(StoreError::DuplicateTailNumber);
        }

        Ok(self
            .aircraft
            .insert_with(|id| Aircraft {
                id,
                tail_number: new.tail_number,
                aircraft_type: new.aircraft_type,
                model: new.model,
            })
            .clone())
    }

    pub fn get_aircraft(&self, id: Id) -> Option<&Aircraft> {
        self.aircraft.get(id)
    }

    pub fn all_aircraft(&self) -> Vec<&Aircraft> {
        self.aircraft.values().collect()
    }
}
