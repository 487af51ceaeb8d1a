//! DTOs for decoding the random user service's JSON responses.
//!
//! Only the fields the cards consume are declared; everything else is ignored.

use serde::Deserialize;

use crate::models::user::UserRecord;

#[derive(Debug, Deserialize)]
pub(super) struct ApiResponseDto {
    pub(super) results: Vec<ProfileDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ProfileDto {
    pub(super) name: NameDto,
    pub(super) email: String,
    pub(super) location: LocationDto,
    pub(super) picture: PictureDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct NameDto {
    pub(super) first: String,
    pub(super) last: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct LocationDto {
    pub(super) city: String,
    pub(super) country: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct PictureDto {
    pub(super) large: String,
}

impl ApiResponseDto {
    pub(super) fn into_user_records(self) -> Vec<UserRecord> {
        self.results
            .into_iter()
            .map(ProfileDto::into_user_record)
            .collect()
    }
}

impl ProfileDto {
    fn into_user_record(self) -> UserRecord {
        UserRecord::new(
            &self.name.first,
            &self.name.last,
            self.email,
            &self.location.city,
            &self.location.country,
            self.picture.large,
        )
    }
}
