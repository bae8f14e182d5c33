/*! Unit coverage for values, expression shapes, scope resolution and tree checks. */
