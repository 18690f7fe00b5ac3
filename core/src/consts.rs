/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use std::ops::RangeInclusive;

pub const PORT_RANGE: RangeInclusive<usize> = 1..=65535;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://depot.sqlite?mode=rwc";

/// Reserved build label resolving to the most recently created ready build.
pub const LATEST_LABEL: &str = "latest";
