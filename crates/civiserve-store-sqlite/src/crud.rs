// crates/civiserve-store-sqlite/src/crud.rs
// ============================================================================
// Module: Entity CRUD
// Description: Typed create/read/update/delete over the six entity tables.
// Purpose: Keep every entity mutation on the writer connection and every
//          primary key on the sequence allocator.
// Dependencies: civiserve-core, rusqlite
// ============================================================================

//! ## Overview
//! All typed entity access lives here. Creates never accept a caller key;
//! they run through [`CivicStore::insert_allocated`] so keys stay strictly
//! increasing under concurrency. Updates and deletes report
//! [`GatewayError::NotFound`] when zero rows match. Status transitions for
//! service requests and grievances validate against the closed status
//! vocabularies before touching the engine.

// ============================================================================
// SECTION: Imports
// ============================================================================

use civiserve_core::Citizen;
use civiserve_core::CitizenPayload;
use civiserve_core::Department;
use civiserve_core::DepartmentPayload;
use civiserve_core::EntityTable;
use civiserve_core::GRIEVANCE_STATUSES;
use civiserve_core::GatewayError;
use civiserve_core::Grievance;
use civiserve_core::GrievancePayload;
use civiserve_core::Payment;
use civiserve_core::PaymentPayload;
use civiserve_core::SERVICE_REQUEST_STATUSES;
use civiserve_core::Service;
use civiserve_core::ServicePayload;
use civiserve_core::ServiceRequest;
use civiserve_core::ServiceRequestPayload;
use rusqlite::OptionalExtension;
use rusqlite::Row;
use rusqlite::params;

use crate::store::CivicStore;

// ============================================================================
// SECTION: Row Mappers
// ============================================================================

/// Maps a `Citizen` row in column order.
fn map_citizen(row: &Row<'_>) -> rusqlite::Result<Citizen> {
    Ok(Citizen {
        Citizen_ID: row.get(0)?,
        Name: row.get(1)?,
        Address: row.get(2)?,
        Phone: row.get(3)?,
        Email: row.get(4)?,
        Aadhaar_Number: row.get(5)?,
    })
}

/// Maps a `Department` row in column order.
fn map_department(row: &Row<'_>) -> rusqlite::Result<Department> {
    Ok(Department {
        Department_ID: row.get(0)?,
        Department_Name: row.get(1)?,
        Contact_Info: row.get(2)?,
    })
}

/// Maps a `Service` row in column order.
fn map_service(row: &Row<'_>) -> rusqlite::Result<Service> {
    Ok(Service {
        Service_ID: row.get(0)?,
        Service_Name: row.get(1)?,
        Service_Type: row.get(2)?,
        Department_ID: row.get(3)?,
    })
}

/// Maps a `Payment` row in column order.
fn map_payment(row: &Row<'_>) -> rusqlite::Result<Payment> {
    Ok(Payment {
        Payment_ID: row.get(0)?,
        Amount: row.get(1)?,
        Payment_Date: row.get(2)?,
        Payment_Method: row.get(3)?,
        Status: row.get(4)?,
    })
}

/// Maps a `Service_Request` row in column order.
fn map_service_request(row: &Row<'_>) -> rusqlite::Result<ServiceRequest> {
    Ok(ServiceRequest {
        Request_ID: row.get(0)?,
        Citizen_ID: row.get(1)?,
        Service_ID: row.get(2)?,
        Request_Date: row.get(3)?,
        Status: row.get(4)?,
        Payment_ID: row.get(5)?,
    })
}

/// Maps a `Grievance` row in column order.
fn map_grievance(row: &Row<'_>) -> rusqlite::Result<Grievance> {
    Ok(Grievance {
        Grievance_ID: row.get(0)?,
        Citizen_ID: row.get(1)?,
        Department_ID: row.get(2)?,
        Description: row.get(3)?,
        Status: row.get(4)?,
        Date: row.get(5)?,
    })
}

// ============================================================================
// SECTION: Citizens
// ============================================================================

impl CivicStore {
    /// Lists citizens ordered by key, windowed by offset and limit.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Db`] on engine failure.
    pub fn list_citizens(&self, offset: i64, limit: i64) -> Result<Vec<Citizen>, GatewayError> {
        let guard = self.reader()?;
        let result = guard
            .prepare(
                "SELECT Citizen_ID, Name, Address, Phone, Email, Aadhaar_Number \
                 FROM Citizen ORDER BY Citizen_ID LIMIT ?1 OFFSET ?2",
            )
            .and_then(|mut statement| {
                statement
                    .query_map(params![limit, offset], map_citizen)?
                    .collect::<rusqlite::Result<Vec<_>>>()
            });
        result.map_err(|err| GatewayError::Db(self.sanitize(&err)))
    }

    /// Fetches one citizen by key.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] when the key is absent.
    pub fn get_citizen(&self, id: i64) -> Result<Citizen, GatewayError> {
        let guard = self.reader()?;
        let row = guard
            .query_row(
                "SELECT Citizen_ID, Name, Address, Phone, Email, Aadhaar_Number \
                 FROM Citizen WHERE Citizen_ID = ?1",
                [id],
                map_citizen,
            )
            .optional()
            .map_err(|err| GatewayError::Db(self.sanitize(&err)))?;
        row.ok_or_else(|| GatewayError::NotFound(format!("citizen {id}")))
    }

    /// Creates a citizen with an allocator-assigned key.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::AllocationExhausted`] when key allocation
    /// retries run out, or [`GatewayError::Db`] on engine failure.
    pub fn create_citizen(&self, payload: &CitizenPayload) -> Result<Citizen, GatewayError> {
        let id = self.insert_allocated(EntityTable::Citizen, |tx, key| {
            tx.execute(
                "INSERT INTO Citizen (Citizen_ID, Name, Address, Phone, Email, Aadhaar_Number) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    key,
                    payload.Name,
                    payload.Address,
                    payload.Phone,
                    payload.Email,
                    payload.Aadhaar_Number
                ],
            )
            .map(|_| ())
        })?;
        Ok(Citizen {
            Citizen_ID: id,
            Name: payload.Name.clone(),
            Address: payload.Address.clone(),
            Phone: payload.Phone.clone(),
            Email: payload.Email.clone(),
            Aadhaar_Number: payload.Aadhaar_Number.clone(),
        })
    }

    /// Replaces every non-key column of a citizen.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] when the key is absent.
    pub fn update_citizen(
        &self,
        id: i64,
        payload: &CitizenPayload,
    ) -> Result<Citizen, GatewayError> {
        let affected = {
            let guard = self.writer()?;
            guard
                .execute(
                    "UPDATE Citizen SET Name = ?1, Address = ?2, Phone = ?3, Email = ?4, \
                     Aadhaar_Number = ?5 WHERE Citizen_ID = ?6",
                    params![
                        payload.Name,
                        payload.Address,
                        payload.Phone,
                        payload.Email,
                        payload.Aadhaar_Number,
                        id
                    ],
                )
                .map_err(|err| GatewayError::Db(self.sanitize(&err)))?
        };
        if affected == 0 {
            return Err(GatewayError::NotFound(format!("citizen {id}")));
        }
        self.get_citizen(id)
    }

    /// Deletes one citizen by key.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] when the key is absent.
    pub fn delete_citizen(&self, id: i64) -> Result<(), GatewayError> {
        self.delete_by_key(EntityTable::Citizen, id, "citizen")
    }
}

// ============================================================================
// SECTION: Departments
// ============================================================================

impl CivicStore {
    /// Lists departments ordered by key, windowed by offset and limit.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Db`] on engine failure.
    pub fn list_departments(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Department>, GatewayError> {
        let guard = self.reader()?;
        let result = guard
            .prepare(
                "SELECT Department_ID, Department_Name, Contact_Info \
                 FROM Department ORDER BY Department_ID LIMIT ?1 OFFSET ?2",
            )
            .and_then(|mut statement| {
                statement
                    .query_map(params![limit, offset], map_department)?
                    .collect::<rusqlite::Result<Vec<_>>>()
            });
        result.map_err(|err| GatewayError::Db(self.sanitize(&err)))
    }

    /// Fetches one department by key.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] when the key is absent.
    pub fn get_department(&self, id: i64) -> Result<Department, GatewayError> {
        let guard = self.reader()?;
        let row = guard
            .query_row(
                "SELECT Department_ID, Department_Name, Contact_Info \
                 FROM Department WHERE Department_ID = ?1",
                [id],
                map_department,
            )
            .optional()
            .map_err(|err| GatewayError::Db(self.sanitize(&err)))?;
        row.ok_or_else(|| GatewayError::NotFound(format!("department {id}")))
    }

    /// Creates a department with an allocator-assigned key.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::AllocationExhausted`] when key allocation
    /// retries run out, or [`GatewayError::Db`] on engine failure.
    pub fn create_department(
        &self,
        payload: &DepartmentPayload,
    ) -> Result<Department, GatewayError> {
        let id = self.insert_allocated(EntityTable::Department, |tx, key| {
            tx.execute(
                "INSERT INTO Department (Department_ID, Department_Name, Contact_Info) \
                 VALUES (?1, ?2, ?3)",
                params![key, payload.Department_Name, payload.Contact_Info],
            )
            .map(|_| ())
        })?;
        Ok(Department {
            Department_ID: id,
            Department_Name: payload.Department_Name.clone(),
            Contact_Info: payload.Contact_Info.clone(),
        })
    }

    /// Replaces every non-key column of a department.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] when the key is absent.
    pub fn update_department(
        &self,
        id: i64,
        payload: &DepartmentPayload,
    ) -> Result<Department, GatewayError> {
        let affected = {
            let guard = self.writer()?;
            guard
                .execute(
                    "UPDATE Department SET Department_Name = ?1, Contact_Info = ?2 \
                     WHERE Department_ID = ?3",
                    params![payload.Department_Name, payload.Contact_Info, id],
                )
                .map_err(|err| GatewayError::Db(self.sanitize(&err)))?
        };
        if affected == 0 {
            return Err(GatewayError::NotFound(format!("department {id}")));
        }
        self.get_department(id)
    }

    /// Deletes one department by key.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] when the key is absent.
    pub fn delete_department(&self, id: i64) -> Result<(), GatewayError> {
        self.delete_by_key(EntityTable::Department, id, "department")
    }
}

// ============================================================================
// SECTION: Services
// ============================================================================

impl CivicStore {
    /// Lists services ordered by key, windowed by offset and limit.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Db`] on engine failure.
    pub fn list_services(&self, offset: i64, limit: i64) -> Result<Vec<Service>, GatewayError> {
        let guard = self.reader()?;
        let result = guard
            .prepare(
                "SELECT Service_ID, Service_Name, Service_Type, Department_ID \
                 FROM Service ORDER BY Service_ID LIMIT ?1 OFFSET ?2",
            )
            .and_then(|mut statement| {
                statement
                    .query_map(params![limit, offset], map_service)?
                    .collect::<rusqlite::Result<Vec<_>>>()
            });
        result.map_err(|err| GatewayError::Db(self.sanitize(&err)))
    }

    /// Fetches one service by key.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] when the key is absent.
    pub fn get_service(&self, id: i64) -> Result<Service, GatewayError> {
        let guard = self.reader()?;
        let row = guard
            .query_row(
                "SELECT Service_ID, Service_Name, Service_Type, Department_ID \
                 FROM Service WHERE Service_ID = ?1",
                [id],
                map_service,
            )
            .optional()
            .map_err(|err| GatewayError::Db(self.sanitize(&err)))?;
        row.ok_or_else(|| GatewayError::NotFound(format!("service {id}")))
    }

    /// Creates a service with an allocator-assigned key.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::AllocationExhausted`] when key allocation
    /// retries run out, or [`GatewayError::Db`] on engine failure.
    pub fn create_service(&self, payload: &ServicePayload) -> Result<Service, GatewayError> {
        let id = self.insert_allocated(EntityTable::Service, |tx, key| {
            tx.execute(
                "INSERT INTO Service (Service_ID, Service_Name, Service_Type, Department_ID) \
                 VALUES (?1, ?2, ?3, ?4)",
                params![key, payload.Service_Name, payload.Service_Type, payload.Department_ID],
            )
            .map(|_| ())
        })?;
        Ok(Service {
            Service_ID: id,
            Service_Name: payload.Service_Name.clone(),
            Service_Type: payload.Service_Type.clone(),
            Department_ID: payload.Department_ID,
        })
    }

    /// Replaces every non-key column of a service.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] when the key is absent.
    pub fn update_service(
        &self,
        id: i64,
        payload: &ServicePayload,
    ) -> Result<Service, GatewayError> {
        let affected = {
            let guard = self.writer()?;
            guard
                .execute(
                    "UPDATE Service SET Service_Name = ?1, Service_Type = ?2, \
                     Department_ID = ?3 WHERE Service_ID = ?4",
                    params![
                        payload.Service_Name,
                        payload.Service_Type,
                        payload.Department_ID,
                        id
                    ],
                )
                .map_err(|err| GatewayError::Db(self.sanitize(&err)))?
        };
        if affected == 0 {
            return Err(GatewayError::NotFound(format!("service {id}")));
        }
        self.get_service(id)
    }

    /// Deletes one service by key.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] when the key is absent.
    pub fn delete_service(&self, id: i64) -> Result<(), GatewayError> {
        self.delete_by_key(EntityTable::Service, id, "service")
    }
}

// ============================================================================
// SECTION: Payments
// ============================================================================

impl CivicStore {
    /// Lists payments ordered by key, windowed by offset and limit.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Db`] on engine failure.
    pub fn list_payments(&self, offset: i64, limit: i64) -> Result<Vec<Payment>, GatewayError> {
        let guard = self.reader()?;
        let result = guard
            .prepare(
                "SELECT Payment_ID, Amount, Payment_Date, Payment_Method, Status \
                 FROM Payment ORDER BY Payment_ID LIMIT ?1 OFFSET ?2",
            )
            .and_then(|mut statement| {
                statement
                    .query_map(params![limit, offset], map_payment)?
                    .collect::<rusqlite::Result<Vec<_>>>()
            });
        result.map_err(|err| GatewayError::Db(self.sanitize(&err)))
    }

    /// Fetches one payment by key.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] when the key is absent.
    pub fn get_payment(&self, id: i64) -> Result<Payment, GatewayError> {
        let guard = self.reader()?;
        let row = guard
            .query_row(
                "SELECT Payment_ID, Amount, Payment_Date, Payment_Method, Status \
                 FROM Payment WHERE Payment_ID = ?1",
                [id],
                map_payment,
            )
            .optional()
            .map_err(|err| GatewayError::Db(self.sanitize(&err)))?;
        row.ok_or_else(|| GatewayError::NotFound(format!("payment {id}")))
    }

    /// Creates a payment with an allocator-assigned key.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::AllocationExhausted`] when key allocation
    /// retries run out, or [`GatewayError::Db`] on engine failure.
    pub fn create_payment(&self, payload: &PaymentPayload) -> Result<Payment, GatewayError> {
        let id = self.insert_allocated(EntityTable::Payment, |tx, key| {
            tx.execute(
                "INSERT INTO Payment (Payment_ID, Amount, Payment_Date, Payment_Method, Status) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    key,
                    payload.Amount,
                    payload.Payment_Date,
                    payload.Payment_Method,
                    payload.Status
                ],
            )
            .map(|_| ())
        })?;
        Ok(Payment {
            Payment_ID: id,
            Amount: payload.Amount,
            Payment_Date: payload.Payment_Date.clone(),
            Payment_Method: payload.Payment_Method.clone(),
            Status: payload.Status.clone(),
        })
    }

    /// Replaces every non-key column of a payment.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] when the key is absent.
    pub fn update_payment(
        &self,
        id: i64,
        payload: &PaymentPayload,
    ) -> Result<Payment, GatewayError> {
        let affected = {
            let guard = self.writer()?;
            guard
                .execute(
                    "UPDATE Payment SET Amount = ?1, Payment_Date = ?2, Payment_Method = ?3, \
                     Status = ?4 WHERE Payment_ID = ?5",
                    params![
                        payload.Amount,
                        payload.Payment_Date,
                        payload.Payment_Method,
                        payload.Status,
                        id
                    ],
                )
                .map_err(|err| GatewayError::Db(self.sanitize(&err)))?
        };
        if affected == 0 {
            return Err(GatewayError::NotFound(format!("payment {id}")));
        }
        self.get_payment(id)
    }

    /// Deletes one payment by key.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] when the key is absent.
    pub fn delete_payment(&self, id: i64) -> Result<(), GatewayError> {
        self.delete_by_key(EntityTable::Payment, id, "payment")
    }
}

// ============================================================================
// SECTION: Service Requests
// ============================================================================

impl CivicStore {
    /// Lists service requests ordered by key, windowed by offset and limit.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Db`] on engine failure.
    pub fn list_service_requests(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<ServiceRequest>, GatewayError> {
        let guard = self.reader()?;
        let result = guard
            .prepare(
                "SELECT Request_ID, Citizen_ID, Service_ID, Request_Date, Status, Payment_ID \
                 FROM Service_Request ORDER BY Request_ID LIMIT ?1 OFFSET ?2",
            )
            .and_then(|mut statement| {
                statement
                    .query_map(params![limit, offset], map_service_request)?
                    .collect::<rusqlite::Result<Vec<_>>>()
            });
        result.map_err(|err| GatewayError::Db(self.sanitize(&err)))
    }

    /// Fetches one service request by key.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] when the key is absent.
    pub fn get_service_request(&self, id: i64) -> Result<ServiceRequest, GatewayError> {
        let guard = self.reader()?;
        let row = guard
            .query_row(
                "SELECT Request_ID, Citizen_ID, Service_ID, Request_Date, Status, Payment_ID \
                 FROM Service_Request WHERE Request_ID = ?1",
                [id],
                map_service_request,
            )
            .optional()
            .map_err(|err| GatewayError::Db(self.sanitize(&err)))?;
        row.ok_or_else(|| GatewayError::NotFound(format!("service request {id}")))
    }

    /// Creates a service request with an allocator-assigned key.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidInput`] for an unknown status label,
    /// [`GatewayError::AllocationExhausted`] when key allocation retries run
    /// out, or [`GatewayError::Db`] on engine failure.
    pub fn create_service_request(
        &self,
        payload: &ServiceRequestPayload,
    ) -> Result<ServiceRequest, GatewayError> {
        validate_status(&payload.Status, &SERVICE_REQUEST_STATUSES)?;
        let id = self.insert_allocated(EntityTable::ServiceRequest, |tx, key| {
            tx.execute(
                "INSERT INTO Service_Request \
                 (Request_ID, Citizen_ID, Service_ID, Request_Date, Status, Payment_ID) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    key,
                    payload.Citizen_ID,
                    payload.Service_ID,
                    payload.Request_Date,
                    payload.Status,
                    payload.Payment_ID
                ],
            )
            .map(|_| ())
        })?;
        Ok(ServiceRequest {
            Request_ID: id,
            Citizen_ID: payload.Citizen_ID,
            Service_ID: payload.Service_ID,
            Request_Date: payload.Request_Date.clone(),
            Status: payload.Status.clone(),
            Payment_ID: payload.Payment_ID,
        })
    }

    /// Replaces every non-key column of a service request.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidInput`] for an unknown status label or
    /// [`GatewayError::NotFound`] when the key is absent.
    pub fn update_service_request(
        &self,
        id: i64,
        payload: &ServiceRequestPayload,
    ) -> Result<ServiceRequest, GatewayError> {
        validate_status(&payload.Status, &SERVICE_REQUEST_STATUSES)?;
        let affected = {
            let guard = self.writer()?;
            guard
                .execute(
                    "UPDATE Service_Request SET Citizen_ID = ?1, Service_ID = ?2, \
                     Request_Date = ?3, Status = ?4, Payment_ID = ?5 WHERE Request_ID = ?6",
                    params![
                        payload.Citizen_ID,
                        payload.Service_ID,
                        payload.Request_Date,
                        payload.Status,
                        payload.Payment_ID,
                        id
                    ],
                )
                .map_err(|err| GatewayError::Db(self.sanitize(&err)))?
        };
        if affected == 0 {
            return Err(GatewayError::NotFound(format!("service request {id}")));
        }
        self.get_service_request(id)
    }

    /// Moves one service request to a new status.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidInput`] for an unknown status label or
    /// [`GatewayError::NotFound`] when the key is absent.
    pub fn set_request_status(
        &self,
        id: i64,
        status: &str,
    ) -> Result<ServiceRequest, GatewayError> {
        validate_status(status, &SERVICE_REQUEST_STATUSES)?;
        let affected = {
            let guard = self.writer()?;
            guard
                .execute(
                    "UPDATE Service_Request SET Status = ?1 WHERE Request_ID = ?2",
                    params![status, id],
                )
                .map_err(|err| GatewayError::Db(self.sanitize(&err)))?
        };
        if affected == 0 {
            return Err(GatewayError::NotFound(format!("service request {id}")));
        }
        self.get_service_request(id)
    }

    /// Deletes one service request by key.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] when the key is absent.
    pub fn delete_service_request(&self, id: i64) -> Result<(), GatewayError> {
        self.delete_by_key(EntityTable::ServiceRequest, id, "service request")
    }
}

// ============================================================================
// SECTION: Grievances
// ============================================================================

impl CivicStore {
    /// Lists grievances ordered by key, windowed by offset and limit.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Db`] on engine failure.
    pub fn list_grievances(&self, offset: i64, limit: i64) -> Result<Vec<Grievance>, GatewayError> {
        let guard = self.reader()?;
        let result = guard
            .prepare(
                "SELECT Grievance_ID, Citizen_ID, Department_ID, Description, Status, Date \
                 FROM Grievance ORDER BY Grievance_ID LIMIT ?1 OFFSET ?2",
            )
            .and_then(|mut statement| {
                statement
                    .query_map(params![limit, offset], map_grievance)?
                    .collect::<rusqlite::Result<Vec<_>>>()
            });
        result.map_err(|err| GatewayError::Db(self.sanitize(&err)))
    }

    /// Fetches one grievance by key.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] when the key is absent.
    pub fn get_grievance(&self, id: i64) -> Result<Grievance, GatewayError> {
        let guard = self.reader()?;
        let row = guard
            .query_row(
                "SELECT Grievance_ID, Citizen_ID, Department_ID, Description, Status, Date \
                 FROM Grievance WHERE Grievance_ID = ?1",
                [id],
                map_grievance,
            )
            .optional()
            .map_err(|err| GatewayError::Db(self.sanitize(&err)))?;
        row.ok_or_else(|| GatewayError::NotFound(format!("grievance {id}")))
    }

    /// Creates a grievance with an allocator-assigned key.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidInput`] for an unknown status label,
    /// [`GatewayError::AllocationExhausted`] when key allocation retries run
    /// out, or [`GatewayError::Db`] on engine failure.
    pub fn create_grievance(&self, payload: &GrievancePayload) -> Result<Grievance, GatewayError> {
        validate_status(&payload.Status, &GRIEVANCE_STATUSES)?;
        let id = self.insert_allocated(EntityTable::Grievance, |tx, key| {
            tx.execute(
                "INSERT INTO Grievance \
                 (Grievance_ID, Citizen_ID, Department_ID, Description, Status, Date) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    key,
                    payload.Citizen_ID,
                    payload.Department_ID,
                    payload.Description,
                    payload.Status,
                    payload.Date
                ],
            )
            .map(|_| ())
        })?;
        Ok(Grievance {
            Grievance_ID: id,
            Citizen_ID: payload.Citizen_ID,
            Department_ID: payload.Department_ID,
            Description: payload.Description.clone(),
            Status: payload.Status.clone(),
            Date: payload.Date.clone(),
        })
    }

    /// Replaces every non-key column of a grievance.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidInput`] for an unknown status label or
    /// [`GatewayError::NotFound`] when the key is absent.
    pub fn update_grievance(
        &self,
        id: i64,
        payload: &GrievancePayload,
    ) -> Result<Grievance, GatewayError> {
        validate_status(&payload.Status, &GRIEVANCE_STATUSES)?;
        let affected = {
            let guard = self.writer()?;
            guard
                .execute(
                    "UPDATE Grievance SET Citizen_ID = ?1, Department_ID = ?2, \
                     Description = ?3, Status = ?4, Date = ?5 WHERE Grievance_ID = ?6",
                    params![
                        payload.Citizen_ID,
                        payload.Department_ID,
                        payload.Description,
                        payload.Status,
                        payload.Date,
                        id
                    ],
                )
                .map_err(|err| GatewayError::Db(self.sanitize(&err)))?
        };
        if affected == 0 {
            return Err(GatewayError::NotFound(format!("grievance {id}")));
        }
        self.get_grievance(id)
    }

    /// Moves one grievance to a new status.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidInput`] for an unknown status label or
    /// [`GatewayError::NotFound`] when the key is absent.
    pub fn set_grievance_status(&self, id: i64, status: &str) -> Result<Grievance, GatewayError> {
        validate_status(status, &GRIEVANCE_STATUSES)?;
        let affected = {
            let guard = self.writer()?;
            guard
                .execute(
                    "UPDATE Grievance SET Status = ?1 WHERE Grievance_ID = ?2",
                    params![status, id],
                )
                .map_err(|err| GatewayError::Db(self.sanitize(&err)))?
        };
        if affected == 0 {
            return Err(GatewayError::NotFound(format!("grievance {id}")));
        }
        self.get_grievance(id)
    }

    /// Deletes one grievance by key.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] when the key is absent.
    pub fn delete_grievance(&self, id: i64) -> Result<(), GatewayError> {
        self.delete_by_key(EntityTable::Grievance, id, "grievance")
    }
}

// ============================================================================
// SECTION: Shared Helpers
// ============================================================================

impl CivicStore {
    /// Deletes one row by primary key, reporting absence as not-found.
    fn delete_by_key(
        &self,
        table: EntityTable,
        id: i64,
        label: &str,
    ) -> Result<(), GatewayError> {
        let sql = format!(
            "DELETE FROM {} WHERE {} = ?1",
            table.table_name(),
            table.primary_key()
        );
        let affected = {
            let guard = self.writer()?;
            guard.execute(&sql, [id]).map_err(|err| GatewayError::Db(self.sanitize(&err)))?
        };
        if affected == 0 {
            return Err(GatewayError::NotFound(format!("{label} {id}")));
        }
        Ok(())
    }
}

/// Rejects a status label outside the accepted vocabulary.
fn validate_status(status: &str, accepted: &[&str]) -> Result<(), GatewayError> {
    if accepted.contains(&status) {
        Ok(())
    } else {
        Err(GatewayError::InvalidInput(format!(
            "status must be one of {}; got {status}",
            accepted.join(", ")
        )))
    }
}
