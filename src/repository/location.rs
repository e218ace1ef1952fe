use diesel::prelude::*;

use crate::domain::location::{Location, NewLocation};
use crate::domain::types::LocationId;
use crate::models::location::{Location as DbLocation, NewLocation as DbNewLocation};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, LocationReader, LocationWriter};

impl LocationReader for DieselRepository {
    fn list_locations(&self) -> RepositoryResult<Vec<Location>> {
        use crate::schema::locations;

        let mut conn = self.conn()?;

        let items = locations::table
            .filter(locations::is_published.eq(true))
            .order(locations::name.asc())
            .load::<DbLocation>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Location>, _>>()?;

        Ok(items)
    }

    fn get_location_by_id(&self, id: LocationId) -> RepositoryResult<Option<Location>> {
        use crate::schema::locations;

        let mut conn = self.conn()?;

        let location = locations::table
            .filter(locations::id.eq(id.get()))
            .first::<DbLocation>(&mut conn)
            .optional()?;

        let location = location.map(TryInto::try_into).transpose()?;
        Ok(location)
    }
}

impl LocationWriter for DieselRepository {
    fn create_location(&self, location: &NewLocation) -> RepositoryResult<usize> {
        use crate::schema::locations;

        let mut conn = self.conn()?;
        let db_location: DbNewLocation = location.clone().into();

        let affected = diesel::insert_into(locations::table)
            .values(db_location)
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_location(&self, id: LocationId) -> RepositoryResult<usize> {
        use crate::schema::{locations, posts};

        let mut conn = self.conn()?;

        // Posts keep existing with a null location reference.
        let affected = conn.transaction(|conn| {
            diesel::update(posts::table.filter(posts::location_id.eq(Some(id.get()))))
                .set(posts::location_id.eq(None::<i32>))
                .execute(conn)?;

            diesel::delete(locations::table.filter(locations::id.eq(id.get()))).execute(conn)
        })?;

        Ok(affected)
    }
}
